/// Source of interactive input, one line at a time.
///
/// Lines are returned without their terminator. `Ok(None)` means the
/// input is exhausted.
pub trait LineSource {
    fn read_line(&mut self) -> std::io::Result<Option<String>>;
}
