//! A max-heap over a fixed set of indices, each carrying an activity score.
//!
//! Scores live outside the heap proper, so an index keeps its score while it is off the heap and
//! re-enters at the same priority. Bumping the score of an index on the heap costs O(log n).

#[derive(Debug)]
pub struct ActivityHeap {
    activity: Vec<f64>,
    position: Vec<Option<usize>>,
    heap: Vec<usize>,
}

impl ActivityHeap {
    /// A heap over indices `0..activity.len()` with the given initial scores. No index is on the heap yet.
    pub fn new(activity: Vec<f64>) -> Self {
        let position = vec![None; activity.len()];
        Self {
            activity,
            position,
            heap: vec![],
        }
    }

    /// Puts `index` on the heap with its stored score. Returns false if it was already there.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.position[index].is_some() {
            return false;
        }
        let at = self.heap.len();
        self.heap.push(index);
        self.position[index] = Some(at);
        self.sift_up(at);
        true
    }

    /// Sets the score of `index` and puts it on the heap.
    pub fn insert_with(&mut self, index: usize, activity: f64) {
        self.activity[index] = activity;
        if !self.insert(index) {
            self.restore(index);
        }
    }

    /// Takes `index` off the heap. Returns false if it was not there.
    pub fn remove(&mut self, index: usize) -> bool {
        let at = match self.position[index] {
            Some(at) => at,
            None => return false,
        };
        let last = self.heap.len() - 1;
        self.swap(at, last);
        self.heap.pop();
        self.position[index] = None;
        if at < self.heap.len() {
            self.restore(self.heap[at]);
        }
        true
    }

    pub fn peek_max(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    pub fn pop_max(&mut self) -> Option<usize> {
        let max = self.peek_max()?;
        self.remove(max);
        Some(max)
    }

    /// Adds `amount` to the score of `index`, whether or not it is on the heap.
    pub fn bump(&mut self, index: usize, amount: f64) {
        self.activity[index] += amount;
        if let Some(at) = self.position[index] {
            self.sift_up(at);
        }
    }

    /// Multiplies every score by `factor`. A positive factor leaves the heap order intact.
    pub fn rescale(&mut self, factor: f64) {
        debug_assert!(factor > 0.0);
        for activity in self.activity.iter_mut() {
            *activity *= factor;
        }
    }

    pub fn activity(&self, index: usize) -> f64 {
        self.activity[index]
    }

    pub fn contains(&self, index: usize) -> bool {
        self.position[index].is_some()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn restore(&mut self, index: usize) {
        if let Some(at) = self.position[index] {
            let at = self.sift_up(at);
            self.sift_down(at);
        }
    }

    fn score_at(&self, at: usize) -> f64 {
        self.activity[self.heap[at]]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut at: usize) -> usize {
        while at > 0 {
            let parent = (at - 1) / 2;
            if self.score_at(parent) >= self.score_at(at) {
                break;
            }
            self.swap(at, parent);
            at = parent;
        }
        at
    }

    fn sift_down(&mut self, mut at: usize) {
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut largest = at;
            if left < self.heap.len() && self.score_at(left) > self.score_at(largest) {
                largest = left;
            }
            if right < self.heap.len() && self.score_at(right) > self.score_at(largest) {
                largest = right;
            }
            if largest == at {
                break;
            }
            self.swap(at, largest);
            at = largest;
        }
    }
}
