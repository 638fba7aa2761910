//! Password reset e-mail over SES

use kernel::error::app_error::{AppResult, ResultExt};
use platform::aws::SesClient;

use crate::domain::service::PasswordResetMailer;
use crate::domain::value_object::{email::Email, user_password::RawPassword};

const PASSWORD_RESET_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif;">
    <p>Hello {{FirstName}},</p>
    <p>Your password has been reset. Your new password is:</p>
    <p style="font-size: 1.25em;"><strong>{{NewPassword}}</strong></p>
    <p>Use it to log in; you can request another reset at any time.</p>
  </body>
</html>
"#;

/// Fill the reset template; both values are HTML-escaped
pub fn render_password_reset(first_name: &str, new_password: &str) -> String {
    PASSWORD_RESET_TEMPLATE
        .replace("{{FirstName}}", &escape_html(first_name))
        .replace("{{NewPassword}}", &escape_html(new_password))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct SesPasswordResetMailer {
    ses: SesClient,
    subject: String,
}

impl SesPasswordResetMailer {
    pub fn new(ses: SesClient, subject: impl Into<String>) -> Self {
        Self {
            ses,
            subject: subject.into(),
        }
    }
}

impl PasswordResetMailer for SesPasswordResetMailer {
    async fn send_password_reset(
        &self,
        to: &Email,
        first_name: &str,
        new_password: &RawPassword,
    ) -> AppResult<()> {
        let html = render_password_reset(first_name, new_password.expose());

        self.ses
            .send_html(to.as_str(), &self.subject, &html)
            .await
            .or_internal("could not send password reset e-mail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_fields_are_filled() {
        let html = render_password_reset("Ada", "Ab3dEf7h");
        assert!(html.contains("Hello Ada,"));
        assert!(html.contains("<strong>Ab3dEf7h</strong>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_template_escapes_values() {
        let html = render_password_reset("<script>", "a&b");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
    }
}
