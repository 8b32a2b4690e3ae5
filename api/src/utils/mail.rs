use common::env::{ServiceMode, CONF};
use common::error_code::{BackendError, ExternalServiceError};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, error, info};

fn build_message(to: &str, subject: &str, html: String) -> Result<Message, ExternalServiceError> {
    let from = CONF
        .smtp
        .sender
        .parse::<Mailbox>()
        .map_err(|e| ExternalServiceError::Email(e.to_string()))?;
    let to = to
        .parse::<Mailbox>()
        .map_err(|e| ExternalServiceError::Email(e.to_string()))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html)
        .map_err(|e| {
            error!("Email parameters error {}", e.to_string());
            ExternalServiceError::Email(e.to_string())
        })
}

fn deliver(email: Message) -> Result<(), ExternalServiceError> {
    let creds = Credentials::new(CONF.smtp.sender.to_owned(), CONF.smtp.password.to_owned());
    let mailer = SmtpTransport::relay(&CONF.smtp.server)
        .map(|c| c.port(CONF.smtp.port))
        .map_err(|e| {
            error!("Email service is crashed {}", e.to_string());
            ExternalServiceError::Email(e.to_string())
        })?
        .credentials(creds)
        .build();

    let send_res = mailer.send(&email).map_err(|e| {
        error!("Email send message failed {}", e.to_string());
        ExternalServiceError::Email(e.to_string())
    })?;
    debug!("mail send res {:?}", send_res);
    Ok(())
}

/// Send one html mail. Test mode only logs it.
pub async fn send_email(to: &str, subject: &str, html: String) -> Result<(), BackendError> {
    if CONF.service_mode == ServiceMode::Test {
        info!("mail to {} [{}]: {}", to, subject, html);
        return Ok(());
    }
    let email = build_message(to, subject, html)?;
    //smtp transport is blocking
    tokio::task::spawn_blocking(move || deliver(email))
        .await
        .map_err(|e| ExternalServiceError::Email(e.to_string()))??;
    Ok(())
}

pub fn verify_email_template(name: &str, otp: &str) -> String {
    format!(
        r#"<p>Hello <strong>{name}</strong>,</p>
<p>Thank you for signing up! To complete your registration, please verify your email.</p>
<p>Your OTP for verification is:</p>
<h3 style="font-size: 32px; font-weight: bold; color: #4CAF50;">{otp}</h3>
<p>If you did not request this, please ignore this email.</p>"#
    )
}

pub fn reset_password_template(name: &str, otp: &str) -> String {
    format!(
        r#"<p>Hello <strong>{name}</strong>,</p>
<p>We received a request to reset your password. To proceed, please use the OTP below:</p>
<h3 style="font-size: 32px; font-weight: bold; color: #4CAF50;">{otp}</h3>
<p>This OTP is valid for 5 minutes. If you did not request a password reset, please ignore this email.</p>"#
    )
}

pub fn eligibility_template(name: &str, status: &str) -> String {
    format!(
        r#"<p>Dear <strong>{name}</strong></p>
<p>Your eligibility status has been updated to: <strong>{status}</strong></p>
<p>Contact support for any questions.</p>"#
    )
}

pub fn payment_image_user_template(name: &str) -> String {
    format!(
        r#"<p>Dear <strong>{name}</strong></p>
<p>Your image has been uploaded successfully and is under review.</p>"#
    )
}

pub fn payment_image_admin_template(name: &str, email: &str, path: &str) -> String {
    format!(
        r#"<h2>User Image Upload</h2>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Uploaded Image:</strong> {path}</p>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_templates() {
        let html = verify_email_template("Ann", "1234");
        assert!(html.contains("<strong>Ann</strong>"));
        assert!(html.contains(">1234</h3>"));
        assert!(eligibility_template("Ann", "Verified").contains("<strong>Verified</strong>"));
        assert!(payment_image_admin_template("Ann", "a@x.com", "/tmp/p.png").contains("/tmp/p.png"));
    }

    #[actix_web::test]
    async fn test_mail_logged_in_test_mode() {
        std::env::set_var(
            "CONFIG",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../config_test.toml"),
        );
        send_email("a@x.com", "subject", reset_password_template("Ann", "1234"))
            .await
            .unwrap();
    }
}
