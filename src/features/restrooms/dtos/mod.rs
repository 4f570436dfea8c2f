mod restroom_dto;

pub use restroom_dto::{ListRestroomsQuery, RestroomDeletedDto, RestroomDto, UpsertRestroomDto};
