/// Transient user-facing error notification
pub(crate) trait Notifier {
    fn notify_error(&self, message: &str);
}

/// One line on stderr per failure
#[derive(Debug, Clone, Copy)]
pub(crate) struct TerminalNotifier {
    use_color: bool,
}

impl TerminalNotifier {
    pub(crate) fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl Notifier for TerminalNotifier {
    fn notify_error(&self, message: &str) {
        if self.use_color {
            eprintln!("\x1b[31m✖\x1b[0m {message}");
        } else {
            eprintln!("error: {message}");
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    messages: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
