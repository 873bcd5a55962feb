use actix_web::web;
use base44::Base44Client;

pub mod routes {
    pub mod conversation;
}

pub mod service {
    pub mod conversation;
}

pub mod view {
    pub mod conversation;
}

pub mod dtos {
    pub mod conversation;
}

pub use view::conversation::ConversationView;

pub fn mount_conversations() -> actix_web::Scope {
    web::scope("/conversations")
        .service(routes::conversation::get_conversations)
        .service(routes::conversation::post_create_conversation)
        .service(routes::conversation::get_conversation)
        .service(routes::conversation::post_message)
        .route(
            "/{id}/events",
            web::get().to(routes::conversation::get_events::<Base44Client>),
        )
}
