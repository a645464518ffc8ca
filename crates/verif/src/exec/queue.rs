//! FIFO inter-task channels.
//!
//! `put` suspends while a bounded queue is at capacity; `get` suspends while
//! the queue is empty. Items come out in exactly the order they went in —
//! the cooperative scheduler never interleaves the critical sections, so no
//! item is duplicated or lost.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct State<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
    putters: VecDeque<Waker>,
    getters: VecDeque<Waker>,
}

/// A FIFO channel handle. Cloning shares the underlying queue.
pub struct Queue<T> {
    state: Rc<RefCell<State<T>>>,
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Queue<T> {
    /// An unbounded queue: `put` never suspends.
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// A bounded queue holding at most `capacity` items (minimum 1).
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity.max(1)))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                items: VecDeque::new(),
                capacity,
                putters: VecDeque::new(),
                getters: VecDeque::new(),
            })),
        }
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// The capacity bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.state.borrow().capacity
    }

    /// Appends `item`, suspending while the queue is at capacity.
    pub fn put(&self, item: T) -> Put<T> {
        Put {
            queue: self.clone(),
            item: Some(item),
        }
    }

    /// Removes the oldest item, suspending while the queue is empty.
    pub fn get(&self) -> Get<T> {
        Get {
            queue: self.clone(),
        }
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Queue")
            .field("len", &state.items.len())
            .field("capacity", &state.capacity)
            .finish()
    }
}

/// Future returned by [`Queue::put`].
pub struct Put<T> {
    queue: Queue<T>,
    item: Option<T>,
}

// No field is structurally pinned; `T` is only ever moved out whole.
impl<T> Unpin for Put<T> {}

impl<T> Future for Put<T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.item.is_none() {
            return Poll::Ready(());
        }
        let mut state = this.queue.state.borrow_mut();
        if state.capacity.is_none_or(|c| state.items.len() < c) {
            if let Some(item) = this.item.take() {
                state.items.push_back(item);
            }
            if let Some(waker) = state.getters.pop_front() {
                waker.wake();
            }
            Poll::Ready(())
        } else {
            state.putters.push_back(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl<T> fmt::Debug for Put<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Put")
            .field("pending", &self.item.is_some())
            .finish()
    }
}

/// Future returned by [`Queue::get`].
pub struct Get<T> {
    queue: Queue<T>,
}

impl<T> Unpin for Get<T> {}

impl<T> Future for Get<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        let mut state = this.queue.state.borrow_mut();
        if let Some(item) = state.items.pop_front() {
            if let Some(waker) = state.putters.pop_front() {
                waker.wake();
            }
            Poll::Ready(item)
        } else {
            state.getters.push_back(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl<T> fmt::Debug for Get<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Get").finish()
    }
}
