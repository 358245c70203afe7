//! Server-sent events decoder

use std::io::BufRead;

use super::stream::CancelToken;

const DEFAULT_EVENT: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SseEvent {
    pub(crate) event: String,
    pub(crate) data: String,
}

/// Iterates events from a buffered reader. Stops early, without yielding
/// already-buffered data, once the attached token is cancelled.
pub(crate) struct SseReader<R> {
    reader: R,
    cancel: Option<CancelToken>,
    done: bool,
}

impl<R: BufRead> SseReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            cancel: None,
            done: false,
        }
    }

    pub(crate) fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl<R: BufRead> Iterator for SseReader<R> {
    type Item = std::io::Result<SseEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut event: Option<String> = None;
        // Only `data:` lines make an event dispatchable
        let mut data: Vec<String> = Vec::new();

        loop {
            if self.done || self.cancelled() {
                self.done = true;
                return None;
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    return (!data.is_empty()).then(|| Ok(build(event, data)));
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }

            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if !data.is_empty() {
                    return Some(Ok(build(event, data)));
                }
                event = None;
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => event = Some(value.to_string()),
                "data" => data.push(value.to_string()),
                // id / retry carry nothing this client uses
                _ => {}
            }
        }
    }
}

fn build(event: Option<String>, data: Vec<String>) -> SseEvent {
    SseEvent {
        event: event
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
        data: data.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn events(input: &str) -> Vec<SseEvent> {
        SseReader::new(Cursor::new(input.as_bytes().to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn ev(event: &str, data: &str) -> SseEvent {
        SseEvent {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn decodes_backend_answer_stream() {
        let input = "event: start\ndata: sess-1\n\n\
                     data: Under the Civil Code,\ndata: a contract is formed\n\n\
                     data: on acceptance.\n\n\
                     event: end\ndata: done\n\n";
        assert_eq!(
            events(input),
            vec![
                ev("start", "sess-1"),
                ev("message", "Under the Civil Code,\na contract is formed"),
                ev("message", "on acceptance."),
                ev("end", "done"),
            ]
        );
    }

    #[test]
    fn accepts_crlf_and_comments() {
        let input = ": keep-alive\r\n\r\nevent: error\r\ndata:boom\r\n\r\n";
        assert_eq!(events(input), vec![ev("error", "boom")]);
    }

    #[test]
    fn trailing_event_without_blank_line() {
        assert_eq!(events("data: tail"), vec![ev("message", "tail")]);
    }

    #[test]
    fn empty_data_line_is_kept() {
        assert_eq!(events("data: a\ndata:\ndata: b\n\n"), vec![ev("message", "a\n\nb")]);
    }

    #[test]
    fn event_without_data_is_dropped() {
        assert_eq!(
            events("event: ping\n\nevent: end\ndata: done\n\nevent: tail"),
            vec![ev("end", "done")]
        );
    }

    #[test]
    fn ignores_unknown_fields() {
        assert_eq!(events("id: 4\nretry: 10\ndata: x\n\n"), vec![ev("message", "x")]);
    }

    #[test]
    fn stops_once_cancelled() {
        let cancel = CancelToken::new();
        let mut reader = SseReader::new(Cursor::new(b"data: one\n\ndata: two\n\n".to_vec()))
            .with_cancel(cancel.clone());

        assert_eq!(reader.next().unwrap().unwrap(), ev("message", "one"));
        cancel.cancel();
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }
}
