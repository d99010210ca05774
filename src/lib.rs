pub mod alphabet;
pub mod cipher;
pub mod config;
pub mod corpus;
pub mod error;
pub mod ngram;
pub mod phonetic;
pub mod reducer;
pub mod reduction;
pub mod search;
// cmd and reports belong to the binary (src/main.rs).
