pub mod d410_superstore;
