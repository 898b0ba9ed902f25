use std::ops::{Index, IndexMut};

/// Row-major rectangular array: `nx` columns by `ny` rows, `data[y * nx + x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid filled with `value`
    pub fn filled(nx: usize, ny: usize, value: T) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// Transposed copy: an `ny` x `nx` grid with `out[x][y] = self[y][x]`
    pub fn transpose(&self) -> Grid<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.nx {
            for y in 0..self.ny {
                data.push(self.data[y * self.nx + x].clone());
            }
        }
        Grid {
            nx: self.ny,
            ny: self.nx,
            data,
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, T::default())
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer. Panics if the length doesn't match.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nx * ny,
            "buffer of {} elements cannot back a {}x{} grid",
            data.len(),
            nx,
            ny
        );
        Self { nx, ny, data }
    }

    /// Build a grid by evaluating `f(x, y)` in row-major order
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for y in 0..ny {
            for x in 0..nx {
                data.push(f(x, y));
            }
        }
        Self { nx, ny, data }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.nx + x]
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.nx..(y + 1) * self.nx]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.nx)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.nx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Element-wise conversion into a new grid of the same shape
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            nx: self.nx,
            ny: self.ny,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl Grid<f32> {
    /// Smallest and largest value, `None` for an empty grid
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.data[y * self.nx + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        &mut self.data[y * self.nx + x]
    }
}
