//! Email service for registration confirmations and scan alerts.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::path::Path;

use crate::{
    config::Config,
    db::models::{pets::PetDBResponse, scans::ScanDBResponse},
    errors::Error,
};

pub struct EmailService {
    transport: EmailTransport,
    from_email: String,
    from_name: String,
}

enum EmailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

impl EmailService {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let email_config = &config.email;

        let transport = match &email_config.transport {
            crate::config::EmailTransportConfig::Smtp {
                host,
                port,
                username,
                password,
                use_tls,
            } => {
                if !use_tls {
                    tracing::warn!("SMTP TLS is disabled - this is not recommended for production");
                }

                let smtp_builder = if *use_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                } else {
                    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host))
                }
                .map_err(|e| Error::Internal {
                    operation: format!("create SMTP transport: {e}"),
                })?
                .port(*port)
                .credentials(Credentials::new(username.clone(), password.clone()));

                EmailTransport::Smtp(smtp_builder.build())
            }
            crate::config::EmailTransportConfig::File { path } => {
                // File transport for development/testing
                let emails_dir = Path::new(path);
                if !emails_dir.exists() {
                    std::fs::create_dir_all(emails_dir).map_err(|e| Error::Internal {
                        operation: format!("create emails directory: {e}"),
                    })?;
                }
                EmailTransport::File(AsyncFileTransport::<Tokio1Executor>::new(emails_dir))
            }
        };

        Ok(Self {
            transport,
            from_email: email_config.from_email.clone(),
            from_name: email_config.from_name.clone(),
        })
    }

    /// Registration confirmation sent to the pet owner.
    pub async fn send_registration_confirmation(&self, pet: &PetDBResponse) -> Result<(), Error> {
        let subject = format!("Registration successful - QR tag for {}", pet.pet_name);
        let body = self.create_registration_body(pet);

        self.send_email(&pet.owner_email, Some(&pet.owner_name), &subject, &body).await
    }

    /// Registration notice sent to the admin who issued the tag.
    pub async fn send_registration_admin_notice(&self, admin_email: &str, admin_name: Option<&str>, pet: &PetDBResponse) -> Result<(), Error> {
        let subject = format!("New pet registered - {}", pet.pet_name);
        let body = format!(
            r#"<div style="font-family: Arial, sans-serif;">
    <h2>New Pet Registered</h2>
    <p>A pet has been registered against one of your tags:</p>
    <ul>
        <li><strong>Pet:</strong> {pet_name}</li>
        <li><strong>Owner:</strong> {owner_name}</li>
        <li><strong>Email:</strong> {owner_email}</li>
        <li><strong>Address:</strong> {owner_address}</li>
    </ul>
</div>"#,
            pet_name = pet.pet_name,
            owner_name = pet.owner_name,
            owner_email = pet.owner_email,
            owner_address = pet.owner_address,
        );

        self.send_email(admin_email, admin_name, &subject, &body).await
    }

    /// Scan alert sent to the pet owner, with the scan location when known.
    pub async fn send_scan_alert(&self, pet: &PetDBResponse, scan: &ScanDBResponse) -> Result<(), Error> {
        let subject = format!("Your pet {}'s tag was just scanned!", pet.pet_name);
        let body = self.create_scan_alert_body(pet, scan);

        self.send_email(&pet.owner_email, Some(&pet.owner_name), &subject, &body).await
    }

    /// Scan notice sent to the admin who issued the tag.
    pub async fn send_scan_admin_notice(&self, admin_email: &str, admin_name: Option<&str>, pet: &PetDBResponse, scan: &ScanDBResponse) -> Result<(), Error> {
        let subject = format!("Tag scanned - {}", pet.pet_name);
        let location = location_line(scan);
        let maps_link = maps_url(scan)
            .map(|url| format!(r#"<p><a href="{url}">View on map</a></p>"#))
            .unwrap_or_default();
        let body = format!(
            r#"<div style="font-family: Arial, sans-serif;">
    <h2>Tag Scanned</h2>
    <p>The tag for <strong>{pet_name}</strong> was scanned.</p>
    <p><strong>Owner:</strong> {owner_name} ({owner_email})</p>
    <p><strong>Location:</strong> {location}</p>
    {maps_link}
    <p><strong>Time:</strong> {time}</p>
</div>"#,
            pet_name = pet.pet_name,
            owner_name = pet.owner_name,
            owner_email = pet.owner_email,
            location = location,
            maps_link = maps_link,
            time = scan.scanned_at.format("%Y-%m-%d %H:%M UTC"),
        );

        self.send_email(admin_email, admin_name, &subject, &body).await
    }

    async fn send_email(&self, to_email: &str, to_name: Option<&str>, subject: &str, body: &str) -> Result<(), Error> {
        let from = format!("{} <{}>", self.from_name, self.from_email)
            .parse::<Mailbox>()
            .map_err(|e| Error::Internal {
                operation: format!("parse from email: {e}"),
            })?;

        let to = if let Some(name) = to_name {
            format!("{name} <{to_email}>")
        } else {
            to_email.to_string()
        }
        .parse::<Mailbox>()
        .map_err(|e| Error::Internal {
            operation: format!("parse to email: {e}"),
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| Error::Internal {
                operation: format!("build email message: {e}"),
            })?;

        match &self.transport {
            EmailTransport::Smtp(smtp) => {
                smtp.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send SMTP email: {e}"),
                })?;
            }
            EmailTransport::File(file) => {
                file.send(message).await.map_err(|e| Error::Internal {
                    operation: format!("send file email: {e}"),
                })?;
            }
        }

        Ok(())
    }

    fn create_registration_body(&self, pet: &PetDBResponse) -> String {
        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #4CAF50;">Registration Successful!</h2>
    <p>Hello <strong>{owner_name}</strong>,</p>
    <p>Your pet <strong>{pet_name}</strong> has been registered in our QR tag system.</p>
    <div style="background: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <h3>Registered Information:</h3>
        <p><strong>Pet:</strong> {pet_name}</p>
        <p><strong>Owner:</strong> {owner_name}</p>
        <p><strong>Address:</strong> {owner_address}</p>
        <p><strong>Email:</strong> {owner_email}</p>
    </div>
    <p>If your pet gets lost and someone scans its tag, you will receive an email with the exact location where it was found.</p>
</div>"#,
            owner_name = pet.owner_name,
            pet_name = pet.pet_name,
            owner_address = pet.owner_address,
            owner_email = pet.owner_email,
        )
    }

    fn create_scan_alert_body(&self, pet: &PetDBResponse, scan: &ScanDBResponse) -> String {
        let location = location_line(scan);
        let maps_button = maps_url(scan)
            .map(|url| {
                format!(
                    r#"<a href="{url}" style="display: inline-block; background: #4CAF50; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; margin-top: 10px;">View on Google Maps</a>"#
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #FF9800;">Scan Alert!</h2>
    <p>Hello <strong>{owner_name}</strong>,</p>
    <p>The QR tag for <strong>{pet_name}</strong> was just scanned.</p>
    <div style="background: #fff3e0; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #FF9800;">
        <h3>Scan Location:</h3>
        <p>{location}</p>
        {maps_button}
    </div>
    <p>Time: {time}</p>
    <p style="color: #666;">If your pet is lost, this information may help you find it.</p>
</div>"#,
            owner_name = pet.owner_name,
            pet_name = pet.pet_name,
            location = location,
            maps_button = maps_button,
            time = scan.scanned_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

/// Google Maps link for a scan, when coordinates were supplied.
fn maps_url(scan: &ScanDBResponse) -> Option<String> {
    match (scan.latitude, scan.longitude) {
        (Some(lat), Some(lng)) => Some(format!("https://www.google.com/maps?q={lat},{lng}")),
        _ => None,
    }
}

fn location_line(scan: &ScanDBResponse) -> String {
    match (scan.latitude, scan.longitude) {
        (Some(lat), Some(lng)) => format!("Latitude: {lat}, Longitude: {lng}"),
        _ => "Location not available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_config, test_pet, test_scan};

    #[tokio::test]
    async fn test_email_service_creation() {
        let config = create_test_config();
        let email_service = EmailService::new(&config);
        assert!(email_service.is_ok());
    }

    #[tokio::test]
    async fn test_registration_body_interpolates_fields() {
        let config = create_test_config();
        let email_service = EmailService::new(&config).unwrap();

        let pet = test_pet();
        let body = email_service.create_registration_body(&pet);

        assert!(body.contains("Hello <strong>Ana Torres</strong>"));
        assert!(body.contains("<strong>Rex</strong>"));
        assert!(body.contains("ana@example.com"));
    }

    #[tokio::test]
    async fn test_scan_alert_body_with_coordinates() {
        let config = create_test_config();
        let email_service = EmailService::new(&config).unwrap();

        let pet = test_pet();
        let scan = test_scan(pet.tag_id, Some((-33.4489, -70.6693)));
        let body = email_service.create_scan_alert_body(&pet, &scan);

        assert!(body.contains("https://www.google.com/maps?q=-33.4489,-70.6693"));
        assert!(body.contains("Latitude: -33.4489, Longitude: -70.6693"));
    }

    #[tokio::test]
    async fn test_scan_alert_body_without_coordinates() {
        let config = create_test_config();
        let email_service = EmailService::new(&config).unwrap();

        let pet = test_pet();
        let scan = test_scan(pet.tag_id, None);
        let body = email_service.create_scan_alert_body(&pet, &scan);

        assert!(body.contains("Location not available"));
        assert!(!body.contains("google.com/maps"));
    }
}
