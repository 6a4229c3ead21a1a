use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single tile of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Floor,
    Start,
    Goal,
}

impl Cell {
    #[inline(always)]
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => ' ',
            Cell::Start => 'S',
            Cell::Goal => 'G',
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Cell::Wall),
            ' ' => Some(Cell::Floor),
            'S' => Some(Cell::Start),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }

    /// Anything but a wall can be walked on
    #[inline(always)]
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Cell::Wall)
    }
}

/// A position on the grid, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    /// Where every agent starts
    pub const START: Pos = Pos { x: 1, y: 1 };

    #[inline(always)]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Move `dist` cells toward `dir`, `None` if that would leave the first quadrant
    /// ```
    /// use maze::{Direction, Pos};
    ///
    /// assert_eq!(Pos::new(3, 1).offset(Direction::Left, 2), Some(Pos::new(1, 1)));
    /// assert_eq!(Pos::new(1, 1).offset(Direction::Up, 2), None);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn offset(self, dir: Direction, dist: usize) -> Option<Pos> {
        let Pos { x, y } = self;
        match dir {
            Direction::Up => match y.checked_sub(dist) {
                Some(y) => Some(Pos { x, y }),
                None => None,
            },
            Direction::Down => match y.checked_add(dist) {
                Some(y) => Some(Pos { x, y }),
                None => None,
            },
            Direction::Left => match x.checked_sub(dist) {
                Some(x) => Some(Pos { x, y }),
                None => None,
            },
            Direction::Right => match x.checked_add(dist) {
                Some(x) => Some(Pos { x, y }),
                None => None,
            },
        }
    }

    /// Direction of a single step from `self` to `other`, if they are adjacent
    #[must_use]
    pub fn direction_to(self, other: Pos) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| self.offset(*d, 1) == Some(other))
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One of the four moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Fixed order used for carving and for path search
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[inline(always)]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            other => Err(Error::InvalidDirection(other.to_owned())),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular maze, stored row-major
///
/// Serializes as a list of row strings using the glyphs `#`, ` `, `S`, `G`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Box<[Cell]>,
}

impl Grid {
    /// A grid made only of walls
    pub(crate) fn walls(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height].into_boxed_slice(),
        }
    }

    /// Parse serialized rows
    /// ```
    /// use maze::{Cell, Grid, Pos};
    ///
    /// let grid = Grid::from_rows(["###", "#S#", "###"]).unwrap();
    /// assert_eq!(grid.shape(), [3, 3]);
    /// assert_eq!(grid.get(Pos::new(1, 1)), Some(Cell::Start));
    /// ```
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();
        for (y, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let before = cells.len();
            for (x, ch) in row.chars().enumerate() {
                cells.push(Cell::from_glyph(ch).ok_or_else(|| {
                    Error::MalformedGrid(format!("unknown glyph {ch:?} at ({x},{y})"))
                })?);
            }
            let len = cells.len() - before;
            match width {
                None => width = Some(len),
                Some(w) if w != len => {
                    return Err(Error::MalformedGrid(format!(
                        "row {y} has {len} cells, expected {w}"
                    )))
                }
                Some(_) => (),
            }
            height += 1;
        }
        let width = width.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(Error::MalformedGrid("empty grid".to_owned()));
        }
        Ok(Self {
            width,
            height,
            cells: cells.into_boxed_slice(),
        })
    }

    #[inline(always)]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    #[must_use]
    pub const fn shape(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    #[inline(always)]
    #[must_use]
    pub const fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Cells of the outer ring
    #[inline(always)]
    #[must_use]
    pub const fn on_boundary(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    /// Inside the grid and off the outer ring
    #[inline(always)]
    #[must_use]
    pub const fn is_interior(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.on_boundary(pos)
    }

    /// Linear index of a position
    /// ```
    /// use maze::{Grid, Pos};
    ///
    /// let grid = Grid::from_rows(["#####", "#S G#", "#####"]).unwrap();
    /// assert_eq!(grid.index(Pos::new(3, 1)), 8);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn index(&self, pos: Pos) -> usize {
        debug_assert!(self.contains(pos));
        pos.y * self.width + pos.x
    }

    /// Position of a linear index
    #[inline(always)]
    #[must_use]
    pub fn pos(&self, index: usize) -> Pos {
        debug_assert!(index < self.cells.len());
        Pos {
            x: index % self.width,
            y: index / self.width,
        }
    }

    /// Cell at `pos`, `None` out of bounds
    #[inline]
    #[must_use]
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Passable cell at `pos`; out of bounds counts as wall
    #[inline]
    #[must_use]
    pub fn is_passable(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(Cell::is_passable)
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Pos, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    /// Passable neighbours of `pos`, in `Direction::ALL` order
    pub fn open_neighbours(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| pos.offset(d, 1))
            .filter(|n| self.is_passable(*n))
    }

    /// First cell holding `cell`, scanning row-major
    #[must_use]
    pub fn find(&self, cell: Cell) -> Option<Pos> {
        self.cells
            .iter()
            .position(|c| *c == cell)
            .map(|i| self.pos(i))
    }

    /// Number of cells holding `cell`
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Iterate over the rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Rows as glyph strings, the stored form of a maze
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|c| c.glyph()).collect())
            .collect()
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<String>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{}", c.glyph())?;
            }
        }
        Ok(())
    }
}
