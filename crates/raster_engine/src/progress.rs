/// Progress callback receiving a percentage `0..=100`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u8);

/// Turns "units of work done" into percentage callbacks.
///
/// Percentages never decrease and the callback only fires when the value changes,
/// so it runs at most once per unit of work.
pub struct ProgressReporter<'a> {
    callback: Option<ProgressFn<'a>>,
    total: u64,
    done: u64,
    last: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(callback: Option<ProgressFn<'a>>, total: u64) -> Self {
        Self {
            callback,
            total,
            done: 0,
            last: None,
        }
    }

    /// Reports 0%.
    pub fn begin(&mut self) {
        self.emit(0);
    }

    /// Marks `units` more work as finished.
    pub fn advance(&mut self, units: u64) {
        self.done = (self.done + units).min(self.total);
        let percent = if self.total == 0 { 100 } else { (self.done * 100 / self.total) as u8 };
        self.emit(percent);
    }

    /// Reports 100%.
    pub fn finish(&mut self) {
        self.done = self.total;
        self.emit(100);
    }

    fn emit(&mut self, percent: u8) {
        if self.last.is_some_and(|last| last >= percent) {
            return;
        }
        self.last = Some(percent);
        if let Some(cb) = self.callback.as_mut() {
            cb(percent);
        }
    }
}
