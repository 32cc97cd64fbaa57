//! The three workload metrics and a fixed-size per-metric container.

use std::ops::{Index, IndexMut};

/// Resource metric modelled by its own transition matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Metric {
    /// CPU usage, percent.
    Cpu = 0,
    /// Memory usage, percent.
    Memory = 1,
    /// Network usage.
    Network = 2,
}

impl Metric {
    /// All three metrics in index order.
    pub const ALL: [Metric; 3] = [Self::Cpu, Self::Memory, Self::Network];

    /// Returns the zero-based index of this metric (matches the `#[repr(u8)]` discriminant).
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Returns the column name used in dataset, trajectory and chain files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "Memory",
            Self::Network => "Network",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// One value per [`Metric`], indexed by the enum rather than by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerMetric<T>([T; 3]);

impl<T> PerMetric<T> {
    /// Builds a container from values in `Cpu, Memory, Network` order.
    pub fn new(cpu: T, memory: T, network: T) -> Self {
        Self([cpu, memory, network])
    }

    /// Builds a container by calling `f` once per metric, in index order.
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self([f(Metric::Cpu), f(Metric::Memory), f(Metric::Network)])
    }

    /// Like [`PerMetric::from_fn`], stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Metric) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self([f(Metric::Cpu)?, f(Metric::Memory)?, f(Metric::Network)?]))
    }

    /// Iterates `(metric, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().zip(self.0.iter())
    }

    /// Applies `f` to each value.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PerMetric<U> {
        PerMetric(self.0.map(f))
    }

    /// Borrows each value.
    pub fn as_ref(&self) -> PerMetric<&T> {
        PerMetric::from_fn(|m| &self[m])
    }
}

impl<T> Index<Metric> for PerMetric<T> {
    type Output = T;

    fn index(&self, metric: Metric) -> &T {
        &self.0[metric.as_index()]
    }
}

impl<T> IndexMut<Metric> for PerMetric<T> {
    fn index_mut(&mut self, metric: Metric) -> &mut T {
        &mut self.0[metric.as_index()]
    }
}
