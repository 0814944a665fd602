/// Client-side session: the identity the client presents to the broker
/// and the policy deciding whether that identity survives a disconnect.
///
/// A session with the clean flag set is discarded the moment its
/// connection is cleanly torn down; a persistent session outlives the
/// connection and is reattached on the next connect.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Session {
    client_identifier: String,
    clean_session: bool,
}

impl Session {
    /// Applies the reuse-or-create rule for a connect attempt.
    ///
    /// A fresh session is created when the caller requests a clean
    /// session, when no prior session exists, or when the prior session
    /// itself was clean. Otherwise the existing session is kept and its
    /// client identifier overrides whatever the caller supplied: a
    /// persistent session's identity is sticky.
    pub(crate) fn resolve(
        existing: Option<Session>,
        clean_session: bool,
        client_identifier: &str,
    ) -> Session {
        match existing {
            Some(existing) if !clean_session && !existing.clean_session => existing,
            _ => Session {
                client_identifier: client_identifier.to_owned(),
                clean_session,
            },
        }
    }

    /// The effective client identifier for this session.
    pub fn client_identifier(&self) -> &str {
        &self.client_identifier
    }

    /// Whether the session is discarded on disconnect.
    pub fn clean_session(&self) -> bool {
        self.clean_session
    }
}
