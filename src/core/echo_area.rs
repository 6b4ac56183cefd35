/// The one-line feedback surface at the bottom of the screen.
#[derive(Debug, Default, Clone)]
pub struct EchoArea {
    message: Option<String>,
}

impl EchoArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn is_active(&self) -> bool {
        self.message.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
