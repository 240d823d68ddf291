use crate::{configuration::EmailClientSettings, domain::EmailObject};
use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::SinglePart,
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use std::time::Duration;

#[async_trait]
pub trait GenericEmailService: Send + Sync {
    async fn send_text_email(&self, to: &str, subject: &str, body: String)
        -> Result<(), anyhow::Error>;

    async fn send_html_email(&self, to: &str, subject: &str, body: String)
        -> Result<(), anyhow::Error>;
}

pub struct SmtpEmailClient {
    pub sender: EmailObject,
    pub mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailClient {
    #[tracing::instrument(skip(email_config))]
    pub fn new(email_config: &EmailClientSettings) -> Result<Self, anyhow::Error> {
        let sender = email_config
            .sender()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid sender email address.")?;
        let smtp_credentials = Credentials::new(
            email_config.username.to_string(),
            email_config.password.expose_secret().to_string(),
        );
        tracing::info!("Establishing connection to the SMTP server.");
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&email_config.base_url)?
                .credentials(smtp_credentials)
                .timeout(Some(email_config.timeout()))
                .pool_config(
                    PoolConfig::new()
                        .min_idle(1)
                        .max_size(10)
                        .idle_timeout(Duration::new(300, 0)),
                )
                .build();

        tracing::info!("SMTP connection created successfully");
        Ok(Self { sender, mailer })
    }
}

#[async_trait]
impl GenericEmailService for SmtpEmailClient {
    async fn send_text_email(
        &self,
        to: &str,
        subject: &str,
        body: String,
    ) -> Result<(), anyhow::Error> {
        let email = Message::builder()
            .from(self.sender.as_ref().parse()?)
            .to(to.parse()?)
            .subject(subject)
            .body(body)?;

        tracing::info!("Sending Email");
        self.mailer.send(email).await?;
        tracing::info!("Mail Send Successfully");
        Ok(())
    }

    async fn send_html_email(
        &self,
        to: &str,
        subject: &str,
        body: String,
    ) -> Result<(), anyhow::Error> {
        let email = Message::builder()
            .from(self.sender.as_ref().parse()?)
            .to(to.parse()?)
            .subject(subject)
            .singlepart(SinglePart::html(body))?;

        tracing::info!("Sending HTML Email");
        self.mailer.send(email).await?;
        tracing::info!("HTML Email Sent Successfully");
        Ok(())
    }
}

pub struct DummyEmailClient {}

impl DummyEmailClient {
    pub fn new() -> Self {
        tracing::info!("Using dummy email client, no mail will leave this process.");
        Self {}
    }
}

impl Default for DummyEmailClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenericEmailService for DummyEmailClient {
    async fn send_text_email(
        &self,
        _to: &str,
        _subject: &str,
        _body: String,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }

    async fn send_html_email(
        &self,
        _to: &str,
        _subject: &str,
        _body: String,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

pub fn otp_email_body(otp: &str, year: i32) -> String {
    format!(
        "<html><body>\
        <p>Use the following code to verify your email address:</p>\
        <h2>{otp}</h2>\
        <p>The code is valid for 10 minutes. If you did not request it, ignore this mail.</p>\
        <p>&copy; {year}</p>\
        </body></html>"
    )
}

pub fn order_confirmation_email_body(
    transaction_ref: &str,
    amount: &str,
    address: &str,
    product_names: &[String],
) -> String {
    let items: String = product_names
        .iter()
        .map(|name| format!("<li>{}</li>", name))
        .collect();
    format!(
        "<html><body>\
        <p>Thank you, your payment was received and your order is confirmed.</p>\
        <p>Reference: <b>{transaction_ref}</b></p>\
        <ul>{items}</ul>\
        <p>Amount paid: {amount}</p>\
        <p>Delivering to: {address}</p>\
        </body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::order_confirmation_email_body;

    #[test]
    fn test_order_confirmation_lists_every_product() {
        let body = order_confirmation_email_body(
            "ref-1",
            "250.00",
            "X",
            &["Dates".to_string(), "Honey".to_string()],
        );
        assert!(body.contains("<li>Dates</li>"));
        assert!(body.contains("<li>Honey</li>"));
        assert!(body.contains("ref-1"));
    }
}
