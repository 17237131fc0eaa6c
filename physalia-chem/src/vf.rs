//! Vento-Foggia (VF) subgraph-isomorphism state machine.
//!
//! [`VfState`] drives a backtracking search for mappings of a query graph
//! `g1` into a target graph `g2`, both given as plain adjacency lists (see
//! [`crate::graph::Graph::to_adjacency_list`]). The feasibility rule is
//! injected as a [`Feasibility`] strategy so atom/bond compatibility stays
//! independent of the search mechanics.
//!
//! A state is single-use: create a fresh one per search. Concurrent searches
//! need independent states; nothing here is shared.

/// Sentinel marking an unmapped vertex in the mapping arrays.
pub const UNMAPPED: usize = usize::MAX;

/// Pluggable rule deciding whether the candidate pair `{n, m}` may extend
/// the current partial mapping. `m1`/`m2` expose the mapping so rules can
/// check edges towards already-mapped neighbors.
pub trait Feasibility {
    fn feasible(&self, n: usize, m: usize, m1: &[usize], m2: &[usize]) -> bool;
}

impl<F> Feasibility for F
where
    F: Fn(usize, usize, &[usize], &[usize]) -> bool,
{
    fn feasible(&self, n: usize, m: usize, m1: &[usize], m2: &[usize]) -> bool {
        self(n, m, m1, m2)
    }
}

/// Incremental mapping state between two adjacency graphs.
///
/// `m1`/`m2` are the mutual mapping arrays; `t1`/`t2` record, per vertex,
/// the depth at which it became a terminal neighbor of the mapping (0 when
/// it is not one). Terminal vertices are preferred by candidate generation,
/// which keeps the mapped subgraph connected-first and prunes the search.
pub struct VfState<'a, F> {
    g1: &'a [Vec<usize>],
    g2: &'a [Vec<usize>],
    m1: Vec<usize>,
    m2: Vec<usize>,
    t1: Vec<usize>,
    t2: Vec<usize>,
    size: usize,
    feasibility: F,
}

impl<'a, F: Feasibility> VfState<'a, F> {
    /// Create a state for matching `g1` in `g2`.
    pub fn new(g1: &'a [Vec<usize>], g2: &'a [Vec<usize>], feasibility: F) -> Self {
        VfState {
            m1: vec![UNMAPPED; g1.len()],
            m2: vec![UNMAPPED; g2.len()],
            t1: vec![0; g1.len()],
            t2: vec![0; g2.len()],
            size: 0,
            g1,
            g2,
            feasibility,
        }
    }

    /// Number of vertices currently mapped.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Exhaustion sentinel for the query side (|V| of g1).
    pub fn n_max(&self) -> usize {
        self.g1.len()
    }

    /// Exhaustion sentinel for the target side (|V| of g2).
    pub fn m_max(&self) -> usize {
        self.g2.len()
    }

    /// The next query candidate after `n` (pass [`UNMAPPED`] to start):
    /// an unmapped terminal vertex if any exists, else the next unmapped
    /// vertex (disconnected queries), else [`VfState::n_max`].
    pub fn next_n(&self, n: usize) -> usize {
        if self.size == 0 {
            return 0;
        }
        let from = n.wrapping_add(1);
        for i in from..self.g1.len() {
            if self.m1[i] == UNMAPPED && self.t1[i] > 0 {
                return i;
            }
        }
        for i in from..self.g1.len() {
            if self.m1[i] == UNMAPPED {
                return i;
            }
        }
        self.n_max()
    }

    /// The next target candidate after `m` for query vertex `n` (pass
    /// [`UNMAPPED`] to start). When `n` is a terminal vertex the candidate
    /// must be terminal too; otherwise any unmapped vertex is acceptable.
    /// Returns [`VfState::m_max`] when exhausted.
    pub fn next_m(&self, n: usize, m: usize) -> usize {
        let from = m.wrapping_add(1);
        if self.size == 0 {
            return from.min(self.m_max());
        }
        for i in from..self.g2.len() {
            if self.m2[i] == UNMAPPED && (self.t1[n] == 0 || self.t2[i] > 0) {
                return i;
            }
        }
        self.m_max()
    }

    /// Feasibility-checked insertion of the pair `{n, m}`. On success the
    /// unmapped neighbors of both vertices are marked terminal at the new
    /// depth; on rejection nothing changes.
    pub fn add(&mut self, n: usize, m: usize) -> bool {
        if !self.feasibility.feasible(n, m, &self.m1, &self.m2) {
            return false;
        }
        self.m1[n] = m;
        self.m2[m] = n;
        self.size += 1;
        let g1 = self.g1;
        for &w in &g1[n] {
            if self.t1[w] == 0 {
                self.t1[w] = self.size;
            }
        }
        let g2 = self.g2;
        for &w in &g2[m] {
            if self.t2[w] == 0 {
                self.t2[w] = self.size;
            }
        }
        true
    }

    /// Undo [`VfState::add`]: unmap the pair and reset exactly the terminal
    /// markers set at or after the depth being undone.
    pub fn remove(&mut self, n: usize, m: usize) {
        self.m1[n] = UNMAPPED;
        self.m2[m] = UNMAPPED;
        self.size -= 1;
        let g1 = self.g1;
        for &w in &g1[n] {
            if self.t1[w] > self.size {
                self.t1[w] = 0;
            }
        }
        let g2 = self.g2;
        for &w in &g2[m] {
            if self.t2[w] > self.size {
                self.t2[w] = 0;
            }
        }
    }

    /// A copy of the current query-to-target mapping.
    pub fn mapping(&self) -> Vec<usize> {
        self.m1.clone()
    }

    /// Run the backtracking search, returning every complete mapping (or
    /// just the first when `early_exit` is set). Completed mappings never
    /// contain [`UNMAPPED`].
    pub fn search(&mut self, early_exit: bool) -> Vec<Vec<usize>> {
        let mut mappings = Vec::new();
        if self.n_max() == 0 || self.n_max() > self.m_max() {
            return mappings;
        }
        self.search_inner(&mut mappings, early_exit);
        mappings
    }

    fn search_inner(&mut self, out: &mut Vec<Vec<usize>>, early_exit: bool) -> bool {
        if self.size == self.n_max() {
            out.push(self.mapping());
            return early_exit;
        }
        let n = self.next_n(UNMAPPED);
        if n == self.n_max() {
            return false;
        }
        let mut m = UNMAPPED;
        loop {
            m = self.next_m(n, m);
            if m >= self.m_max() {
                return false;
            }
            if self.add(n, m) {
                let stop = self.search_inner(out, early_exit);
                self.remove(n, m);
                if stop {
                    return true;
                }
            }
        }
    }

    #[cfg(test)]
    fn terminal_sets(&self) -> (Vec<usize>, Vec<usize>) {
        (self.t1.clone(), self.t2.clone())
    }
}
