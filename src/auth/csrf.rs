use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_LEN: usize = 32;
const TOKEN_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Double-submit anti-forgery gate. One random token per authenticated
/// session, rotated at session establishment; mutating requests must echo it
/// in the `x-csrf-token` header.
#[derive(Clone, Default)]
pub struct AntiForgeryGate {
    tokens: Arc<Mutex<HashMap<Uuid, String>>>,
}

impl AntiForgeryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous token for the session. Rotation invalidates
    /// stale tokens held by a prior login.
    pub fn rotate(&self, principal_id: Uuid) -> String {
        let token = generate_token();
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(principal_id, token.clone());
        token
    }

    /// Current token for an authenticated session, issuing one if the
    /// session predates this process.
    pub fn token_for(&self, principal_id: Uuid) -> String {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens
            .entry(principal_id)
            .or_insert_with(generate_token)
            .clone()
    }

    pub fn check(&self, principal_id: Uuid, presented: &str) -> bool {
        let tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        match tokens.get(&principal_id) {
            Some(expected) => constant_time_eq(expected.as_bytes(), presented.as_bytes()),
            None => false,
        }
    }

    pub fn clear(&self, principal_id: Uuid) {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&principal_id);
    }
}

fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARS[rng.gen_range(0..TOKEN_CHARS.len())] as char)
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
