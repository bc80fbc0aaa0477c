pub mod fit;
pub mod multiply;
pub mod svd;
