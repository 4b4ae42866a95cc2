mod repository;

pub use repository::get_id_by_api_key;
