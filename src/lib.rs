macro_rules! sort_impl {
    ($name:expr) => {
        pub struct SortImpl;

        impl crate::sort::ListSort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            #[inline]
            fn sort_by<T, F>(ring: &mut crate::list::Ring<T>, head: usize, compare: F)
            where
                F: FnMut(&T, &T) -> Ordering,
            {
                sort_by(ring, head, compare);
            }
        }
    };
}

pub mod api;
pub mod error;
pub mod list;
pub mod merge;
pub mod patterns;
pub mod queue;
pub mod sort;

pub use error::QueueError;
pub use queue::{Element, Queue};
pub use sort::ListSort;
