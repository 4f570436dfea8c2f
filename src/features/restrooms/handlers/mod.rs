pub mod restroom_handler;

pub use restroom_handler::{
    __path_delete_restroom, __path_get_restroom, __path_list_restrooms, __path_upsert_restroom,
    delete_restroom, get_restroom, list_restrooms, upsert_restroom,
};
