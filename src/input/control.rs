//! Control modifier latch and control-character mapping

/// One-shot control modifier, typically armed from an on-screen key.
///
/// The latch is consumed by the next encoded event, whatever that event
/// produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlLatch {
    armed: bool,
}

impl ControlLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the latch for the next event
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Flip the latch, as an on-screen toggle key does
    pub fn toggle(&mut self) {
        self.armed = !self.armed;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Read and reset the latch
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

/// Map a character to the byte produced by holding control.
///
/// Returns `None` for characters without a control form.
pub fn control_code(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        ' ' | '2' | '@' => Some(0x00),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        ']' | '5' => Some(0x1d),
        '^' | '6' => Some(0x1e),
        '_' | '-' | '7' | '/' => Some(0x1f),
        '8' => Some(0x7f),
        _ => None,
    }
}

/// Apply the control mapping to every character of `text`.
///
/// Characters without a control form are passed through as UTF-8.
pub fn apply_control(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match control_code(c) {
            Some(code) => bytes.push(code),
            None => bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_is_one_shot() {
        let mut latch = ControlLatch::new();
        assert!(!latch.take());

        latch.arm();
        assert!(latch.is_armed());
        assert!(latch.take());
        assert!(!latch.is_armed());
        assert!(!latch.take());
    }

    #[test]
    fn test_latch_toggle() {
        let mut latch = ControlLatch::new();
        latch.toggle();
        assert!(latch.is_armed());
        latch.toggle();
        assert!(!latch.is_armed());
    }

    #[test]
    fn test_control_letters() {
        assert_eq!(control_code('a'), Some(0x01));
        assert_eq!(control_code('c'), Some(0x03));
        assert_eq!(control_code('C'), Some(0x03));
        assert_eq!(control_code('z'), Some(0x1a));
    }

    #[test]
    fn test_control_punctuation() {
        assert_eq!(control_code(' '), Some(0x00));
        assert_eq!(control_code('@'), Some(0x00));
        assert_eq!(control_code('['), Some(0x1b));
        assert_eq!(control_code('\\'), Some(0x1c));
        assert_eq!(control_code(']'), Some(0x1d));
        assert_eq!(control_code('^'), Some(0x1e));
        assert_eq!(control_code('/'), Some(0x1f));
        assert_eq!(control_code('8'), Some(0x7f));
        assert_eq!(control_code('é'), None);
        assert_eq!(control_code('1'), None);
    }

    #[test]
    fn test_apply_control_passes_unmapped() {
        assert_eq!(apply_control("c"), vec![0x03]);
        assert_eq!(apply_control("aé"), vec![0x01, 0xc3, 0xa9]);
        assert_eq!(apply_control(""), Vec::<u8>::new());
    }
}
