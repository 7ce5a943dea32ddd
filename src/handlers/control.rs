use crate::protocol::{CommandCode, SaveMode};

const SAVE_RESERVED: [u8; 2] = [0x00, 0x00];

/// Raw variable update sent with the set-variable opcode.
///
/// The body layout is controller firmware specific and is sent as given.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SetVariable {
    body: Vec<u8>,
}

impl SetVariable {
    #[must_use]
    pub fn new(body: Vec<u8>) -> Self {
        Self { body }
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(1 + self.body.len());
        payload.push(CommandCode::SetVariable.as_raw());
        payload.extend_from_slice(&self.body);
        payload
    }
}

pub(crate) fn encode_persistence(mode: SaveMode) -> Vec<u8> {
    let mut payload = vec![CommandCode::Save.as_raw(), mode.as_raw()];
    payload.extend_from_slice(&SAVE_RESERVED);
    payload
}

pub(crate) fn encode_exit() -> Vec<u8> {
    vec![CommandCode::Exit.as_raw()]
}
