use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;

use crate::error::ServiceError;

/// Outgoing-mail collaborator. Built once at startup from environment
/// variables; when SMTP is not configured every send reports a recoverable
/// mail failure so callers can flag "saved but notification failed" without
/// rolling anything back.
#[derive(Clone)]
pub struct MailService {
    transport: Option<SmtpTransport>,
    from: String,
    base_url: String,
}

impl MailService {
    /// Reads SMTP_HOST, SMTP_PORT (default 587), SMTP_USERNAME,
    /// SMTP_PASSWORD, MAIL_FROM and APP_BASE_URL.
    pub fn from_env() -> Self {
        let base_url = env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let from = env::var("MAIL_FROM")
            .or_else(|_| env::var("SMTP_USERNAME"))
            .unwrap_or_else(|_| "fleetcare@localhost".to_string());

        let transport = match env::var("SMTP_HOST") {
            Ok(host) => {
                let port = env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(587);
                let mut builder = match SmtpTransport::starttls_relay(&host) {
                    Ok(builder) => builder.port(port),
                    Err(e) => {
                        log::warn!("Could not configure SMTP relay {}: {}", host, e);
                        return Self { transport: None, from, base_url };
                    }
                };
                if let (Ok(user), Ok(pass)) = (env::var("SMTP_USERNAME"), env::var("SMTP_PASSWORD"))
                {
                    builder = builder.credentials(Credentials::new(user, pass));
                }
                Some(builder.build())
            }
            Err(_) => {
                log::warn!("SMTP_HOST not set; activation emails will not be delivered");
                None
            }
        };

        Self { transport, from, base_url }
    }

    /// The link placed in the activation email.
    pub fn activation_link(&self, token: &str) -> String {
        format!("{}/usuario/uuid/{}", self.base_url, token)
    }

    /// Email the activation link to a freshly registered (or re-requesting)
    /// user. The SMTP call is blocking, so it is pushed onto the blocking
    /// pool. Failure here is recoverable by design.
    pub async fn send_activation_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), ServiceError> {
        let mailer = self.clone();
        let to = to.to_string();
        let name = name.to_string();
        let token = token.to_string();

        log::info!("Sending the account activation email to {}...", to);
        tokio::task::spawn_blocking(move || mailer.send_activation_blocking(&to, &name, &token))
            .await
            .map_err(|e| ServiceError::Mail(format!("mail task failed: {}", e)))?
    }

    fn send_activation_blocking(&self, to: &str, name: &str, token: &str) -> Result<(), ServiceError> {
        let Some(transport) = &self.transport else {
            return Err(ServiceError::Mail("SMTP transport not configured".to_string()));
        };

        let link = self.activation_link(token);
        let body = format!(
            "Olá {},\n\
             \n\
             Seu cadastro no FleetCare foi recebido. Para ativar sua conta,\n\
             acesse o link abaixo dentro dos próximos 25 minutos:\n\
             \n\
             {}\n\
             \n\
             Se você não solicitou este cadastro, ignore esta mensagem.\n\
             \n\
             Equipe FleetCare",
            name, link
        );

        let email = Message::builder()
            .from(
                format!("FleetCare <{}>", self.from)
                    .parse()
                    .map_err(|e| ServiceError::Mail(format!("invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| ServiceError::Mail(format!("invalid to address: {}", e)))?)
            .subject("Ativação de Conta no FleetCare")
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ServiceError::Mail(format!("failed to build email: {}", e)))?;

        transport
            .send(&email)
            .map(|_| ())
            .map_err(|e| ServiceError::Mail(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> MailService {
        MailService {
            transport: None,
            from: "fleetcare@localhost".to_string(),
            base_url: "http://fleet.example.com".to_string(),
        }
    }

    #[test]
    fn test_activation_link_format() {
        let mailer = unconfigured();
        let token = "0a076571-b74c-4c4c-9ec5-5b9b544090bd";
        assert_eq!(
            mailer.activation_link(token),
            "http://fleet.example.com/usuario/uuid/0a076571-b74c-4c4c-9ec5-5b9b544090bd"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_transport_is_a_recoverable_mail_error() {
        let mailer = unconfigured();
        let result = mailer
            .send_activation_email("fulano@email.com", "Fulano", "token")
            .await;
        assert!(matches!(result, Err(ServiceError::Mail(_))));
    }
}
