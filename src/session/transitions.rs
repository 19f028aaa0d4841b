use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use super::{Effect, Entry, Session, View};
use crate::config::{EditorAction, GlobalAction, NavAction};
use crate::message::{Message, Request};
use crate::secret::{decode, encode};
use crate::ui::{Component, EventResult, ListEvent, TextInputEvent};

impl Session {
    pub(super) fn on_key(&mut self, key: KeyEvent) -> Effect {
        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            return Effect::Quit;
        }

        match self.view {
            View::SelectingAction | View::SelectingNamespace | View::SelectingSecret => {
                self.on_list_key(key)
            }
            View::EnteringName => self.on_name_key(key),
            View::EditingPayload => self.on_editor_key(key),
        }
    }

    pub(super) fn on_paste(&mut self, text: &str) {
        match self.view {
            View::EnteringName => {
                self.name_input.focus();
                self.name_input.insert_str(text);
            }
            View::EditingPayload => {
                self.editor.focus();
                self.editor.insert_str(text);
            }
            _ => {}
        }
    }

    pub(super) fn on_message(&mut self, message: Message) -> Effect {
        // Only one request is ever in flight, so any result settles it.
        self.pending = None;

        match message {
            Message::NamespacesLoaded(namespaces) => {
                if self.view != View::SelectingNamespace {
                    debug!(view = ?self.view, "Dropping stale namespace list");
                    return Effect::Idle;
                }
                self.list
                    .set_items(namespaces.into_iter().map(Entry::Namespace).collect());
            }
            Message::SecretsLoaded { namespace, secrets } => {
                if self.view != View::SelectingSecret
                    || self.namespace.as_deref() != Some(namespace.as_str())
                {
                    debug!(namespace = %namespace, "Dropping stale secret list");
                    return Effect::Idle;
                }
                self.list.set_items(
                    secrets
                        .iter()
                        .map(|s| Entry::Secret(s.name.clone()))
                        .collect(),
                );
                self.secrets = secrets;
            }
            Message::QueryFailed(reason) => {
                self.error = Some(format!("Query failed: {reason}"));
            }
            Message::Saved(path) => {
                info!(path = ?path, "Secret saved and encrypted");
                return Effect::Done(path);
            }
            Message::SaveFailed(reason) | Message::EncryptFailed(reason) => {
                self.error = Some(reason);
            }
        }
        Effect::Idle
    }

    fn on_list_key(&mut self, key: KeyEvent) -> Effect {
        if self.list.is_empty() && self.resolver.matches_nav(&key, NavAction::Select) {
            return self.retry_query();
        }

        match self.list.handle_key(key) {
            EventResult::Event(ListEvent::Activated(entry)) => self.activate(entry),
            _ => Effect::Idle,
        }
    }

    fn on_name_key(&mut self, key: KeyEvent) -> Effect {
        if self.resolver.matches_editor(&key, EditorAction::Blur) {
            self.name_input.blur();
            return Effect::Idle;
        }
        if self.resolver.matches_editor(&key, EditorAction::Save) {
            let name = self.name_input.value().to_string();
            return self.confirm_name(&name);
        }

        self.name_input.focus();
        match self.name_input.handle_key(key) {
            EventResult::Event(TextInputEvent::Submitted(name)) => self.confirm_name(&name),
            _ => Effect::Idle,
        }
    }

    fn on_editor_key(&mut self, key: KeyEvent) -> Effect {
        if self.resolver.matches_editor(&key, EditorAction::Blur) {
            self.editor.blur();
            return Effect::Idle;
        }
        if self.resolver.matches_editor(&key, EditorAction::Save) {
            return self.save();
        }

        self.editor.focus();
        if !self.editor.handle_key(key).is_consumed() {
            debug!(key = ?key.code, "Key not handled by the editor");
        }
        Effect::Idle
    }

    fn activate(&mut self, entry: Entry) -> Effect {
        if self.pending.is_some() {
            return Effect::Idle;
        }

        match entry {
            Entry::CreateNew => {
                self.name_input.clear();
                self.name_input.focus();
                self.secret_name = None;
                self.enter(View::EnteringName);
                Effect::Idle
            }
            Entry::UpdateExisting => self.request(View::SelectingNamespace, Request::ListNamespaces),
            Entry::Namespace(namespace) => {
                self.namespace = Some(namespace.clone());
                self.request(View::SelectingSecret, Request::ListSecrets { namespace })
            }
            Entry::Secret(name) => {
                self.open_secret(name);
                Effect::Idle
            }
        }
    }

    /// Enter on an empty list asks again, e.g. after a failed query.
    fn retry_query(&mut self) -> Effect {
        if self.pending.is_some() {
            return Effect::Idle;
        }
        match (self.view, &self.namespace) {
            (View::SelectingNamespace, _) => {
                self.request(View::SelectingNamespace, Request::ListNamespaces)
            }
            (View::SelectingSecret, Some(namespace)) => {
                let namespace = namespace.clone();
                self.request(View::SelectingSecret, Request::ListSecrets { namespace })
            }
            _ => {
                self.error = Some("Nothing to select.".to_string());
                Effect::Idle
            }
        }
    }

    fn open_secret(&mut self, name: String) {
        let Some(secret) = self.secrets.iter().find(|s| s.name == name) else {
            warn!(secret = %name, "Selected secret is not in the fetched list");
            self.error = Some(format!("Secret '{name}' is no longer available."));
            return;
        };
        let text = encode(&secret.data);
        // Multi-line, binary or padded values would change on save.
        if decode(&text).as_ref() != Ok(&secret.data) {
            warn!(secret = %name, "Secret data does not survive key: value editing");
            self.error = Some(format!(
                "Secret '{name}' has multi-line or binary values and cannot be edited as key: value text."
            ));
            return;
        }
        self.editor.set_value(&text);
        self.editor.focus();
        self.secret_name = Some(name);
        self.enter(View::EditingPayload);
    }

    fn confirm_name(&mut self, name: &str) -> Effect {
        let name = name.trim();
        if name.is_empty() {
            self.error = Some("The secret name must not be empty.".to_string());
            return Effect::Idle;
        }
        if name.contains(['/', '\\']) {
            self.error = Some("The secret name must not contain a path separator.".to_string());
            return Effect::Idle;
        }

        self.secret_name = Some(name.to_string());
        self.editor.set_value("");
        self.editor.focus();
        self.enter(View::EditingPayload);
        Effect::Idle
    }

    fn save(&mut self) -> Effect {
        if self.pending.is_some() {
            return Effect::Idle;
        }
        let Some(name) = self.secret_name.clone() else {
            self.error = Some("No secret name chosen.".to_string());
            return Effect::Idle;
        };

        match decode(&self.editor.value()) {
            Ok(data) => {
                self.error = None;
                let request = Request::Save { name, data };
                self.pending = Some(request.clone());
                Effect::Run(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Effect::Idle
            }
        }
    }

    /// Switch to `view` with a fresh, empty list and ask for its items.
    fn request(&mut self, view: View, request: Request) -> Effect {
        self.list.set_items(Vec::new());
        if view == View::SelectingNamespace {
            self.namespace = None;
        }
        self.secrets.clear();
        self.enter(view);
        self.pending = Some(request.clone());
        Effect::Run(request)
    }

    fn enter(&mut self, view: View) {
        debug!(from = ?self.view, to = ?view, "View transition");
        self.view = view;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::config::KeyResolver;
    use crate::secret::{SecretData, SecretSummary};
    use crate::session::{Input, dispatch};

    fn session() -> Session {
        Session::new(Arc::new(KeyResolver::default()))
    }

    fn key(code: KeyCode) -> Input {
        Input::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Input {
        Input::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(session: &mut Session, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            assert_eq!(dispatch(session, key(code)), Effect::Idle);
        }
    }

    fn secret(name: &str, payload: &str) -> SecretSummary {
        SecretSummary {
            name: name.to_string(),
            data: decode(payload).unwrap(),
        }
    }

    /// Drive a fresh session to `SelectingSecret` in `prod` with the given secrets loaded.
    fn at_secret_list(secrets: Vec<SecretSummary>) -> Session {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Down));
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::NamespacesLoaded(vec!["prod".into()])),
        );
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::SecretsLoaded {
                namespace: "prod".into(),
                secrets,
            }),
        );
        assert_eq!(s.view(), View::SelectingSecret);
        s
    }

    fn at_editor(name: &str) -> Session {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Enter));
        type_str(&mut s, name);
        dispatch(&mut s, key(KeyCode::Enter));
        assert_eq!(s.view(), View::EditingPayload);
        s
    }

    #[test]
    fn test_create_new_enters_name_without_request() {
        let mut s = session();
        assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);
        assert_eq!(s.view(), View::EnteringName);
        assert_eq!(s.name_input.value(), "");
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_update_existing_requests_namespaces_once() {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Down));
        assert_eq!(
            dispatch(&mut s, key(KeyCode::Enter)),
            Effect::Run(Request::ListNamespaces)
        );
        assert_eq!(s.view(), View::SelectingNamespace);
        // A second enter while the query is pending does nothing.
        assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);
    }

    #[test]
    fn test_selecting_prod_lists_prod_secrets() {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Down));
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::NamespacesLoaded(vec![
                "default".into(),
                "prod".into(),
            ])),
        );
        dispatch(&mut s, key(KeyCode::Down));
        assert_eq!(
            dispatch(&mut s, key(KeyCode::Enter)),
            Effect::Run(Request::ListSecrets {
                namespace: "prod".into()
            })
        );
        assert_eq!(s.view(), View::SelectingSecret);
    }

    #[test]
    fn test_quit_from_every_view() {
        let mut views = vec![session(), at_editor("creds")];

        let mut name = session();
        dispatch(&mut name, key(KeyCode::Enter));
        views.push(name);

        let mut namespaces = session();
        dispatch(&mut namespaces, key(KeyCode::Down));
        dispatch(&mut namespaces, key(KeyCode::Enter));
        views.push(namespaces);

        views.push(at_secret_list(vec![]));

        for mut s in views {
            let view = s.view();
            assert_eq!(dispatch(&mut s, ctrl('c')), Effect::Quit, "{view:?}");
            assert_eq!(dispatch(&mut s, Input::Quit), Effect::Quit, "{view:?}");
        }
    }

    #[test]
    fn test_selecting_secret_fills_editor() {
        let mut s = at_secret_list(vec![
            secret("api", "token: t0k3n"),
            secret("db", "password: hunter2\nuser: admin"),
        ]);
        dispatch(&mut s, key(KeyCode::Down));
        assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);

        assert_eq!(s.view(), View::EditingPayload);
        assert_eq!(s.editor.value(), "password: hunter2\nuser: admin");
        assert_eq!(s.secret_name.as_deref(), Some("db"));
    }

    #[test]
    fn test_save_requests_pipeline_with_decoded_payload() {
        let mut s = at_editor("creds");
        type_str(&mut s, "password: hunter2\napi-key: abc123");

        let expected: SecretData = [
            ("password".to_string(), "aHVudGVyMg==".to_string()),
            ("api-key".to_string(), "YWJjMTIz".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            dispatch(&mut s, ctrl('s')),
            Effect::Run(Request::Save {
                name: "creds".into(),
                data: expected
            })
        );
        assert_eq!(s.view(), View::EditingPayload);
        // Saving again while the first save runs is ignored.
        assert_eq!(dispatch(&mut s, ctrl('s')), Effect::Idle);
    }

    #[test]
    fn test_malformed_payload_sets_error() {
        let mut s = at_editor("creds");
        type_str(&mut s, "a: 1\nno separator");
        assert_eq!(dispatch(&mut s, ctrl('s')), Effect::Idle);
        assert_eq!(s.view(), View::EditingPayload);
        assert!(s.error().unwrap().contains("Line 2"));
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_failures_keep_the_view() {
        let mut s = at_editor("creds");
        type_str(&mut s, "a: 1");
        dispatch(&mut s, ctrl('s'));

        let effect = dispatch(
            &mut s,
            Input::Message(Message::EncryptFailed(
                "sops failed. The unencrypted file is still on disk.".into(),
            )),
        );
        assert_eq!(effect, Effect::Idle);
        assert_eq!(s.view(), View::EditingPayload);
        assert!(s.error().unwrap().contains("still on disk"));
        assert!(s.pending().is_none());

        // The user can retry the save.
        assert!(matches!(dispatch(&mut s, ctrl('s')), Effect::Run(Request::Save { .. })));
        assert!(s.error().is_none());
    }

    #[test]
    fn test_query_failure_then_retry() {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Down));
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::QueryFailed("connection refused".into())),
        );
        assert_eq!(s.view(), View::SelectingNamespace);
        assert!(s.error().unwrap().contains("connection refused"));

        assert_eq!(
            dispatch(&mut s, key(KeyCode::Enter)),
            Effect::Run(Request::ListNamespaces)
        );
        assert!(s.error().is_none());
    }

    #[test]
    fn test_saved_finishes() {
        let mut s = at_editor("creds");
        let path = PathBuf::from("creds.yaml");
        assert_eq!(
            dispatch(&mut s, Input::Message(Message::Saved(path.clone()))),
            Effect::Done(path)
        );
    }

    #[test]
    fn test_esc_blurs_and_typing_refocuses() {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Enter));
        type_str(&mut s, "ab");

        dispatch(&mut s, key(KeyCode::Esc));
        assert!(!s.name_input.is_focused());
        assert_eq!(s.name_input.value(), "ab");

        type_str(&mut s, "c");
        assert!(s.name_input.is_focused());
        assert_eq!(s.name_input.value(), "abc");
    }

    #[test]
    fn test_esc_in_editor_keeps_buffer() {
        let mut s = at_editor("creds");
        type_str(&mut s, "a: 1");
        dispatch(&mut s, key(KeyCode::Esc));
        assert!(!s.editor.is_focused());
        assert_eq!(s.editor.value(), "a: 1");
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for name in ["", "   ", "../etc/passwd", "a\\b"] {
            let mut s = session();
            dispatch(&mut s, key(KeyCode::Enter));
            type_str(&mut s, name);
            assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);
            assert_eq!(s.view(), View::EnteringName, "{name:?}");
            assert!(s.error().is_some(), "{name:?}");
        }
    }

    #[test]
    fn test_stale_secret_list_is_dropped() {
        let mut s = session();
        dispatch(&mut s, key(KeyCode::Down));
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::NamespacesLoaded(vec!["prod".into()])),
        );
        dispatch(&mut s, key(KeyCode::Enter));
        dispatch(
            &mut s,
            Input::Message(Message::SecretsLoaded {
                namespace: "default".into(),
                secrets: vec![secret("other", "a: b")],
            }),
        );
        assert!(s.list.is_empty());
    }

    #[test]
    fn test_missing_secret_sets_error() {
        let mut s = at_secret_list(vec![secret("db", "a: b")]);
        s.secrets.clear();
        assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);
        assert_eq!(s.view(), View::SelectingSecret);
        assert!(s.error().unwrap().contains("db"));
    }

    #[test]
    fn test_secrets_that_would_change_on_save_are_refused() {
        let multi_line = SecretSummary {
            name: "config".into(),
            data: [("app".to_string(), STANDARD.encode("a\nb: c"))]
                .into_iter()
                .collect(),
        };
        let binary = SecretSummary {
            name: "keystore".into(),
            data: [("jks".to_string(), STANDARD.encode([0xff]))]
                .into_iter()
                .collect(),
        };

        for (index, name) in ["config", "keystore"].into_iter().enumerate() {
            let mut s = at_secret_list(vec![multi_line.clone(), binary.clone()]);
            if index == 1 {
                dispatch(&mut s, key(KeyCode::Down));
            }
            assert_eq!(dispatch(&mut s, key(KeyCode::Enter)), Effect::Idle);
            assert_eq!(s.view(), View::SelectingSecret, "{name}");
            assert!(s.error().unwrap().contains(name), "{name}");
            assert!(s.secret_name.is_none(), "{name}");
        }
    }

    #[test]
    fn test_paste_goes_to_editor() {
        let mut s = at_editor("creds");
        dispatch(&mut s, key(KeyCode::Esc));
        dispatch(&mut s, Input::Paste("user: admin\npass: x".into()));
        assert!(s.editor.is_focused());
        assert_eq!(s.editor.value(), "user: admin\npass: x");
    }
}
