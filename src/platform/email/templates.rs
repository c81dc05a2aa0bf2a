use chrono::{DateTime, Utc};

use super::EmailMessage;

/// Escape text for HTML bodies and attribute values
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("Hi {},", name.trim()),
        _ => "Hi,".to_string(),
    }
}

pub fn invite_email(to: &str, name: Option<&str>, accept_url: &str, expires_at: DateTime<Utc>) -> EmailMessage {
    let greeting = greeting(name);
    let expires = expires_at.format("%Y-%m-%d %H:%M UTC");

    EmailMessage {
        to: to.to_string(),
        subject: "You have been invited".to_string(),
        text: format!(
            "{greeting}\n\nAn account has been created for you. Set your password to get started:\n\n{accept_url}\n\nThis link expires on {expires}.\n"
        ),
        html: format!(
            "<p>{greeting}</p><p>An account has been created for you. Set your password to get started:</p>\
             <p><a href=\"{accept_url}\">Accept invitation</a></p><p>This link expires on {expires}.</p>",
            greeting = escape_html(&greeting),
            accept_url = escape_html(accept_url),
        ),
    }
}

pub fn password_reset_email(to: &str, name: Option<&str>, reset_url: &str) -> EmailMessage {
    let greeting = greeting(name);

    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        text: format!(
            "{greeting}\n\nA password reset was requested for your account. Choose a new password here:\n\n{reset_url}\n\nIf you did not expect this email you can ignore it.\n"
        ),
        html: format!(
            "<p>{greeting}</p><p>A password reset was requested for your account.</p>\
             <p><a href=\"{reset_url}\">Choose a new password</a></p><p>If you did not expect this email you can ignore it.</p>",
            greeting = escape_html(&greeting),
            reset_url = escape_html(reset_url),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_contains_link_and_expiry() {
        let expires = DateTime::parse_from_rfc3339("2030-01-02T03:04:00Z").unwrap().with_timezone(&Utc);
        let email = invite_email("ada@example.com", Some("Ada"), "https://app/invite?token=t", expires);
        assert!(email.text.starts_with("Hi Ada,"));
        assert!(email.text.contains("https://app/invite?token=t"));
        assert!(email.html.contains("2030-01-02 03:04 UTC"));
    }

    #[test]
    fn blank_names_get_generic_greeting() {
        let email = password_reset_email("ada@example.com", Some("  "), "https://reset");
        assert!(email.text.starts_with("Hi,"));
    }

    #[test]
    fn html_body_escapes_names_and_links() {
        let expires = DateTime::parse_from_rfc3339("2030-01-02T03:04:00Z").unwrap().with_timezone(&Utc);
        let email = invite_email(
            "ada@example.com",
            Some("<script>alert(1)</script>"),
            "https://app/invite/accept?token=t&x=\"y\"",
            expires,
        );
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("Hi &lt;script&gt;alert(1)&lt;/script&gt;,"));
        assert!(email.html.contains("href=\"https://app/invite/accept?token=t&amp;x=&quot;y&quot;\""));
        assert!(email.text.starts_with("Hi <script>alert(1)</script>,"));

        let reset = password_reset_email("ada@example.com", Some("Tom & 'Jerry'"), "https://reset");
        assert!(reset.html.contains("Hi Tom &amp; &#39;Jerry&#39;,"));
    }
}
