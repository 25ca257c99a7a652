use std::sync::Mutex;

use lookup_logging::{lookup_info, lookup_warn, set_session};

static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        MESSAGES.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

#[test]
fn messages_carry_the_current_session_tag() {
    static LOGGER: CaptureLogger = CaptureLogger;
    log::set_logger(&LOGGER).expect("no other logger in this binary");
    log::set_max_level(log::LevelFilter::Trace);

    set_session(7);
    lookup_info!("cycle started");
    lookup_warn!("chunk {} undeliverable", 3);

    let messages = MESSAGES.lock().unwrap();
    assert!(messages.contains(&"[session 7] cycle started".to_string()));
    assert!(messages.contains(&"[session 7] chunk 3 undeliverable".to_string()));
}

#[test]
fn session_defaults_to_zero_on_fresh_threads() {
    let session = std::thread::spawn(lookup_logging::get_session)
        .join()
        .expect("probe thread");
    assert_eq!(session, 0);
}
