use actix_web::web;

pub mod routes {
    pub mod dashboard;
    pub mod key;
    pub mod usage;

    #[cfg(test)]
    pub(crate) mod testing;
}

pub mod service {
    pub mod cache;
    pub mod generator;
    pub mod key;
    pub mod usage;
}

pub mod view {
    pub mod model;
    pub mod state;
}

pub mod dtos {
    pub mod key;
    pub mod usage;
}

pub use service::cache::KeyListCache;

pub fn mount_keys() -> actix_web::Scope {
    web::scope("/keys")
        .service(routes::key::get_keys)
        .service(routes::key::post_create_key)
        .service(routes::key::delete_key)
        .service(routes::key::post_toggle_visibility)
        .service(routes::key::post_copy_key)
}

pub fn mount_usage() -> actix_web::Scope {
    web::scope("/usage").service(routes::usage::get_usage)
}

pub fn mount_summary() -> actix_web::Scope {
    web::scope("/summary").service(routes::dashboard::get_summary)
}
