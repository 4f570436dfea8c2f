mod restroom;

pub use restroom::Restroom;
