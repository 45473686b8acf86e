use crate::Assignment;
use serde::{Deserialize, Serialize};

pub const ASSIGNMENT_SUBJECT: &str = "Your Secret Santa Assignment!";
const NO_WISHES: &str = "No specific wishes.";

/// An outgoing email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn wishlist_text(wishlist: &[String]) -> String {
    if wishlist.is_empty() {
        return NO_WISHES.to_string();
    }
    wishlist
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wishlist_html(wishlist: &[String]) -> String {
    if wishlist.is_empty() {
        return format!("<em>{}</em>", NO_WISHES);
    }
    let items = wishlist
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect::<String>();
    format!("<ol>{}</ol>", items)
}

/// The email telling a giver who they are buying a present for
pub fn assignment_mail(assignment: &Assignment) -> MailMessage {
    let text = format!(
        "Ho Ho Ho!\n\nYou are the Secret Santa for: {}\n\nTheir Wishlist:\n{}\n\nHappy Gifting!",
        assignment.receiver_name,
        wishlist_text(&assignment.receiver_wishlist)
    );
    let html = format!(
        "<h1>Ho Ho Ho!</h1><p>You are the Secret Santa for: <strong>{}</strong></p><p>Their Wishlist:</p>{}<p>Happy Gifting!</p>",
        escape_html(&assignment.receiver_name),
        wishlist_html(&assignment.receiver_wishlist)
    );

    MailMessage {
        to: assignment.giver_email.clone(),
        subject: ASSIGNMENT_SUBJECT.to_string(),
        text,
        html,
    }
}
