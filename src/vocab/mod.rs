pub mod pool;
pub mod sort;
pub mod word;

pub use word::Word;
