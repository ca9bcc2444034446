/// Group numeric digits to facilitate reading long numbers
pub fn group_digits<F: std::fmt::Display>(n: F) -> String {
    use numsep::{separate, Locale};
    separate(n, Locale::English)
}


pub mod timing {

    use super::group_digits;
    use std::time::Instant;

    /// Logs the duration of consecutive steps of a long computation.
    pub struct Progress {
        previous: Instant,
        message: String,
    }

    impl Progress {

        #[allow(clippy::new_without_default)]
        pub fn new() -> Self { Self { previous: Instant::now(), message: String::new() } }

        /// Log message and start timer
        pub fn start(&mut self, message: &str) {
            tracing::info!("{message} ...");
            self.message = message.to_owned();
            self.start_timer();
        }

        // Log time elapsed since last start or done
        pub fn done(&mut self) {
            tracing::info!("{}: {} ms", self.message, group_digits(self.previous.elapsed().as_millis()));
            self.start_timer();
        }

        // Log message followed by time elapsed since last start or done
        pub fn done_with_message(&mut self, message: &str) {
            tracing::info!("{}: {message}: {} ms", self.message,
                           group_digits(self.previous.elapsed().as_millis()));
            self.start_timer();
        }

        fn start_timer(&mut self) { self.previous = Instant::now() }
    }
}
