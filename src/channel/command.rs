//! Pairing protocol command set.

/// A named protocol command carried over the message channel.
///
/// Wire names match the pairing command table of the channel server
/// protocol; [`Command::as_str`] yields the exact string sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Ask the supplicant for its device metadata and confirmation code.
    RequestSupplicantMetadata,
    /// Poll for remote-side authorization changes.
    Heartbeat,
    /// Tell the supplicant the authority approved the pairing.
    Authorize,
    /// Tell the supplicant the authority declined the pairing.
    Decline,
    /// Ask the supplicant for its encrypted key bundle.
    RequestKeysJwe,
}

impl Command {
    /// Wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Command::RequestSupplicantMetadata => "PAIR_REQUEST_SUPPLICANT_METADATA",
            Command::Heartbeat => "PAIR_HEARTBEAT",
            Command::Authorize => "PAIR_AUTHORIZE",
            Command::Decline => "PAIR_DECLINE",
            Command::RequestKeysJwe => "PAIR_REQUEST_KEYS_JWE",
        }
    }

    /// Whether the command is answered with a correlated response.
    ///
    /// Fire-and-forget commands resolve on transport delivery only.
    pub const fn expects_response(self) -> bool {
        match self {
            Command::RequestSupplicantMetadata | Command::Heartbeat | Command::RequestKeysJwe => {
                true
            }
            Command::Authorize | Command::Decline => false,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
