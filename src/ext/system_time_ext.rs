use std::time::SystemTime;

pub trait SystemTimeExt {
    /// Milliseconds since the Unix epoch, or `None` for times before it.
    fn unix_millis(&self) -> Option<u128>;
}

impl SystemTimeExt for SystemTime {
    fn unix_millis(&self) -> Option<u128> {
        self.duration_since(SystemTime::UNIX_EPOCH)
            .ok()
            .map(|elapsed| elapsed.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn epoch_offsets_are_reported_in_millis() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(time.unix_millis(), Some(1_500));
    }

    #[test]
    fn times_before_the_epoch_have_no_offset() {
        let time = SystemTime::UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(time.unix_millis(), None);
    }
}
