use std::sync::Arc;

use actix_web::{
    HttpResponse, Responder,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    get, post,
    web::{self, Bytes},
};
use base44::{Base44Client, store::AgentBackend};
use chrono::Utc;
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    token::AccessToken,
};
use futures::{StreamExt, future, stream};
use log::{debug, info};

use crate::{
    dtos::conversation::{ConversationEvent, ConversationListResponse, SendMessageRequest},
    service,
    view::conversation::ConversationView,
};

/// Lists the caller's conversations with the configured agent.
#[get("")]
pub async fn get_conversations(
    client: web::Data<Base44Client>,
    config: web::Data<Arc<Config>>,
    token: web::ReqData<AccessToken>,
) -> Res<impl Responder> {
    let conversations =
        service::conversation::list_conversations(client.get_ref(), token.as_str(), &config.agent_name)
            .await?;
    Success::ok(ConversationListResponse { conversations })
}

/// Starts a new chat named after today's date.
#[post("")]
pub async fn post_create_conversation(
    client: web::Data<Base44Client>,
    config: web::Data<Arc<Config>>,
    token: web::ReqData<AccessToken>,
) -> Res<impl Responder> {
    let conversation = service::conversation::create_conversation(
        client.get_ref(),
        token.as_str(),
        &config.agent_name,
        Utc::now().date_naive(),
    )
    .await?;
    Success::created(conversation)
}

#[get("/{id}")]
pub async fn get_conversation(
    client: web::Data<Base44Client>,
    token: web::ReqData<AccessToken>,
    path: web::Path<String>,
) -> Res<impl Responder> {
    let conversation = client.get_conversation(token.as_str(), &path).await?;
    Success::ok(conversation)
}

/// Sends a user message. The assistant's reply arrives through `/events`.
///
/// # Input
/// - `content`: message text, must not be blank
#[post("/{id}/messages")]
pub async fn post_message(
    client: web::Data<Base44Client>,
    token: web::ReqData<AccessToken>,
    path: web::Path<String>,
    req: web::Json<SendMessageRequest>,
) -> Res<impl Responder> {
    let message =
        service::conversation::send_message(client.get_ref(), token.as_str(), &path, &req.content)
            .await?;
    Success::created(message)
}

fn event_frame<B: AgentBackend>(view: &ConversationView<B>) -> Res<Bytes> {
    let event = ConversationEvent {
        conversation_id: view.current_id().unwrap_or_default(),
        messages: view.messages(),
    };
    let json = serde_json::to_string(&event)
        .map_err(|e| AppError::Internal(format!("Failed to encode conversation event: {}", e)))?;
    Ok(Bytes::from(format!("data: {}\n\n", json)))
}

/// Server-sent events for one conversation: the current snapshot, then one
/// frame per change. The subscription lives exactly as long as the stream,
/// so it is released when the client goes away.
///
/// # Frontend Example
/// ```javascript
/// const events = new EventSource(`/api/agent/conversations/${id}/events`, { withCredentials: true });
/// events.onmessage = (e) => setMessages(JSON.parse(e.data).messages);
/// ```
pub async fn get_events<B: AgentBackend + Clone + 'static>(
    client: web::Data<B>,
    token: web::ReqData<AccessToken>,
    path: web::Path<String>,
) -> Res<HttpResponse> {
    let mut view = ConversationView::new(client.get_ref().clone(), token.as_str());
    view.open(&path).await?;
    let first = event_frame(&view)?;
    info!("Streaming conversation {}", path);

    let updates = stream::unfold(view, |mut view: ConversationView<B>| async move {
        loop {
            match view.next_update().await {
                Some(true) => {
                    let frame = event_frame(&view);
                    return Some((frame, view));
                }
                Some(false) => continue,
                None => {
                    debug!("Conversation stream ended");
                    return None;
                }
            }
        }
    });
    let body = stream::once(future::ready(Ok::<_, AppError>(first))).chain(updates);

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpMessage, dev::Service, http::StatusCode, test};

    macro_rules! app {
        () => {{
            let config = Arc::new(Config::for_tests());
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Base44Client::from_config(&config)))
                    .app_data(web::Data::new(config))
                    .wrap_fn(|req, srv| {
                        req.extensions_mut().insert(AccessToken("t".to_string()));
                        srv.call(req)
                    })
                    .service(crate::mount_conversations()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn event_stream_releases_subscription_when_client_leaves() {
        use base44::{
            memory::MemoryBackend,
            models::{
                conversation::{Conversation, Message},
                user::User,
            },
        };

        let backend = MemoryBackend::new().with_session(
            "t",
            User {
                email: "dev@blocknode.app".to_string(),
                full_name: None,
                role: None,
            },
        );
        backend.insert_conversation(
            "dev@blocknode.app",
            Conversation {
                id: "c1".to_string(),
                agent_name: Some("blocknode_assistant".to_string()),
                metadata: None,
                messages: vec![Message::user("hi")],
                created_date: None,
            },
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend.clone()))
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(AccessToken("t".to_string()));
                    srv.call(req)
                })
                .route(
                    "/conversations/{id}/events",
                    web::get().to(get_events::<MemoryBackend>),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/conversations/c1/events")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "text/event-stream"
        );
        assert_eq!(backend.subscriber_count("c1"), 1);

        drop(res);
        assert_eq!(backend.subscriber_count("c1"), 0);
        assert_eq!(backend.push_update("c1", vec![]), 0);
    }

    #[actix_web::test]
    async fn event_stream_for_unknown_conversation_is_not_found() {
        use base44::{memory::MemoryBackend, models::user::User};

        let backend = MemoryBackend::new().with_session(
            "t",
            User {
                email: "dev@blocknode.app".to_string(),
                full_name: None,
                role: None,
            },
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend.clone()))
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(AccessToken("t".to_string()));
                    srv.call(req)
                })
                .route(
                    "/conversations/{id}/events",
                    web::get().to(get_events::<MemoryBackend>),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/conversations/missing/events")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(backend.subscriber_count("missing"), 0);
    }

    #[actix_web::test]
    async fn blank_message_is_rejected_before_any_call() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/conversations/c1/messages")
            .set_json(serde_json::json!({ "content": "   " }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Message cannot be empty");
    }
}
