use actix_web::HttpRequest;
use common::data_structures::feedback::Feedback;
use common::error_code::{BackendError, BackendRes};
use models::feedback::{FeedbackEntity, FeedbackFilter};
use models::general::get_pg_pool_connect;
use models::{PgLocalCli, PsqlOp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rewards::FeedbackRequest;
use crate::utils::{get_session_user, token_auth};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FeedbackAuthor {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FeedbackView {
    pub id: String,
    pub content: String,
    pub user: FeedbackAuthor,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FeedbackReply {
    pub feedback: FeedbackView,
}

pub async fn req(req: HttpRequest, request_data: FeedbackRequest) -> BackendRes<FeedbackReply> {
    let user_id = token_auth::validate_credentials(&req)?;
    let content = match request_data.content {
        Some(content) if !content.trim().is_empty() => content,
        _ => Err(BackendError::RequestParamInvalid(
            "Feedback content is required".to_string(),
        ))?,
    };

    let mut db_cli: PgLocalCli = get_pg_pool_connect().await?;
    let mut db_cli = db_cli.begin().await?;
    let user = get_session_user(&user_id, &mut db_cli).await?;
    //one feedback per account, the new one replaces the old
    FeedbackEntity::delete(FeedbackFilter::ByUserId(&user.id), &mut db_cli).await?;
    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        content,
    };
    FeedbackEntity::new_with_specified(feedback.clone())
        .insert(&mut db_cli)
        .await?;
    db_cli.commit().await?;

    Ok(Some(FeedbackReply {
        feedback: FeedbackView {
            id: feedback.id,
            content: feedback.content,
            user: FeedbackAuthor {
                name: user.name,
                email: user.email,
            },
        },
    }))
}
