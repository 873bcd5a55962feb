use actix_web::web;

pub mod routes {
    pub mod settings;
    pub mod site;
}

pub mod service {
    pub mod logo;
    pub mod settings;
}

pub mod dtos {
    pub mod settings;
}

pub fn mount_site() -> actix_web::Scope {
    web::scope("/site").service(routes::site::get_site)
}

pub fn mount_settings() -> actix_web::Scope {
    web::scope("/settings")
        .service(routes::settings::get_settings)
        .service(routes::settings::put_settings)
        .service(routes::settings::post_logo)
}
