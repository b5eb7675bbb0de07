//! Email message envelope and delivery receipt

use std::fmt;

use serde::Serialize;

use crate::domain::communication::email_addresses::EmailAddress;

/// A mailbox: an address with an optional display name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mailbox {
    /// The display name, e.g. `Course Registration`
    pub name: Option<String>,

    /// The email address
    pub address: EmailAddress,
}

impl Mailbox {
    /// Create a new mailbox
    pub fn new(name: Option<&str>, address: EmailAddress) -> Self {
        Self {
            name: name.map(str::to_string),
            address,
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\"{}\" <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// A fully assembled email, ready to hand to a [`Mailer`](super::Mailer)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEnvelope {
    /// The sender of the email
    pub from: Mailbox,

    /// The recipient of the email
    pub to: Mailbox,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,
}

/// SMTP envelope addresses reported back after a send
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveryEnvelope {
    /// The `MAIL FROM` address
    pub from: String,

    /// The `RCPT TO` addresses
    pub to: Vec<String>,
}

/// What the transport reports after the server accepted a message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    /// The `Message-ID` header of the sent message
    pub message_id: String,

    /// The SMTP envelope
    pub envelope: DeliveryEnvelope,

    /// Recipients the server accepted
    pub accepted: Vec<String>,

    /// Recipients the server rejected
    pub rejected: Vec<String>,

    /// The server's final reply, e.g. `250 2.0.0 Ok: queued`
    pub response: String,
}
