mod restroom_service;

pub use restroom_service::RestroomService;
