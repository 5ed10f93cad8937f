// src/menu_sync/utils/progress.rs
use std::cell::RefCell;
use std::fmt;

type ProgressObserver = Box<dyn Fn(u8)>;

/// Per-file upload progress for a batch. Overall progress is the mean of the
/// per-file percentages, every file weighted equally.
#[derive(Default)]
pub struct UploadProgress {
    files: RefCell<Vec<f64>>,
    observer: RefCell<Option<ProgressObserver>>,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback receiving the rounded overall percentage after every change.
    /// The callback must not update this tracker itself.
    pub fn subscribe(&self, observer: impl Fn(u8) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    /// Starts tracking `file_count` files, all at 0%.
    pub fn reset(&self, file_count: usize) {
        *self.files.borrow_mut() = vec![0.0; file_count];
        self.notify();
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }

    /// Sets the percentage (clamped to 0..=100) of one file. Unknown indexes are ignored.
    pub fn update(&self, index: usize, percentage: f64) {
        {
            let mut files = self.files.borrow_mut();
            match files.get_mut(index) {
                Some(slot) => *slot = percentage.clamp(0.0, 100.0),
                None => return,
            }
        }
        self.notify();
    }

    pub fn complete(&self, index: usize) {
        self.update(index, 100.0);
    }

    pub fn complete_all(&self) {
        {
            let mut files = self.files.borrow_mut();
            files.iter_mut().for_each(|slot| *slot = 100.0);
        }
        self.notify();
    }

    pub fn file(&self, index: usize) -> Option<f64> {
        self.files.borrow().get(index).copied()
    }

    pub fn overall(&self) -> f64 {
        let files = self.files.borrow();
        if files.is_empty() {
            return 0.0;
        }
        files.iter().sum::<f64>() / files.len() as f64
    }

    pub fn percent(&self) -> u8 {
        self.overall().round() as u8
    }

    fn notify(&self) {
        let percent = self.percent();
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(percent);
        }
    }
}

impl fmt::Debug for UploadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadProgress")
            .field("files", &self.files.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn overall_is_the_mean_of_files() {
        let progress = UploadProgress::new();
        progress.reset(4);
        progress.complete(0);
        progress.update(1, 50.0);
        assert_eq!(progress.overall(), 37.5);
        assert_eq!(progress.percent(), 38);
    }

    #[test]
    fn updates_are_clamped_and_out_of_range_ignored() {
        let progress = UploadProgress::new();
        progress.reset(2);
        progress.update(0, 140.0);
        progress.update(5, 10.0);
        assert_eq!(progress.file(0), Some(100.0));
        assert_eq!(progress.percent(), 50);
    }

    #[test]
    fn observer_sees_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let progress = UploadProgress::new();
        let sink = Rc::clone(&seen);
        progress.subscribe(move |percent| sink.borrow_mut().push(percent));

        progress.reset(2);
        progress.complete(1);
        progress.complete_all();

        assert_eq!(*seen.borrow(), vec![0, 50, 100]);
    }
}
