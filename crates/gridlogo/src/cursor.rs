use crate::{Canvas, ExecError, Grid};

/// The unit step taken by a cursor facing `heading`.
///
/// Heading 0 points up the grid (towards smaller `y`) and angles grow
/// counter-clockwise, so 90 points left. Headings past 180 mirror the
/// ones below it across the vertical axis.
pub fn offset(heading: i64) -> Result<(i64, i64), ExecError> {
    if heading > 180 {
        let (x, y) =
            offset(360 - heading).map_err(|_| ExecError::UnsupportedHeading { heading })?;
        return Ok((-x, y));
    }
    Ok(match heading {
        0 => (0, -1),
        45 => (-1, -1),
        90 => (-1, 0),
        135 => (-1, 1),
        180 => (0, 1),
        _ => return Err(ExecError::UnsupportedHeading { heading }),
    })
}

/// The turtle.
pub struct Cursor<'a, C: Canvas + ?Sized = Grid> {
    canvas: &'a mut C,
    x: i64,
    y: i64,
    // Invariant: 0 <= heading < 360.
    heading: i64,
}

impl<'a, C: Canvas + ?Sized> Cursor<'a, C> {
    /// Puts a new cursor in the middle of `canvas`, facing up, and marks
    /// the cell it starts on.
    pub fn new(canvas: &'a mut C) -> Result<Self, ExecError> {
        let center = (canvas.size() / 2) as i64;
        canvas.visit(center, center)?;
        Ok(Cursor {
            canvas,
            x: center,
            y: center,
            heading: 0,
        })
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    pub fn heading(&self) -> i64 {
        self.heading
    }

    pub fn forward(&mut self, steps: i64) -> Result<(), ExecError> {
        self.walk(steps, 1)
    }

    pub fn backward(&mut self, steps: i64) -> Result<(), ExecError> {
        self.walk(steps, -1)
    }

    pub fn turn_left(&mut self, degrees: i64) {
        self.heading = (self.heading + degrees.rem_euclid(360)) % 360;
    }

    pub fn turn_right(&mut self, degrees: i64) {
        self.heading = (self.heading - degrees.rem_euclid(360)).rem_euclid(360);
    }

    // Every cell along the way gets visited, not just the last one. If a
    // step falls off the canvas, the cursor stays on the last good cell.
    fn walk(&mut self, steps: i64, sign: i64) -> Result<(), ExecError> {
        if steps <= 0 {
            return Ok(());
        }
        let (dx, dy) = offset(self.heading)?;
        for _ in 0..steps {
            let (x, y) = (self.x + sign * dx, self.y + sign * dy);
            self.canvas.visit(x, y)?;
            self.x = x;
            self.y = y;
        }
        log::trace!("walked {steps} to ({}, {})", self.x, self.y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Remembers every visit, in order.
    struct Recorder {
        size: usize,
        visits: Vec<(i64, i64)>,
    }

    impl Recorder {
        fn new(size: usize) -> Self {
            Recorder {
                size,
                visits: Vec::new(),
            }
        }
    }

    impl Canvas for Recorder {
        fn size(&self) -> usize {
            self.size
        }

        fn visit(&mut self, x: i64, y: i64) -> Result<(), ExecError> {
            self.visits.push((x, y));
            Ok(())
        }
    }

    fn visits(f: impl FnOnce(&mut Cursor<Recorder>)) -> Vec<(i64, i64)> {
        let mut canvas = Recorder::new(7);
        let mut cursor = Cursor::new(&mut canvas).unwrap();
        f(&mut cursor);
        // Skip the starting cell.
        canvas.visits[1..].to_vec()
    }

    #[test]
    fn starts_in_the_middle() {
        let mut canvas = Recorder::new(7);
        let cursor = Cursor::new(&mut canvas).unwrap();
        assert_eq!(cursor.position(), (3, 3));
        assert_eq!(cursor.heading(), 0);
        assert_eq!(canvas.visits, vec![(3, 3)]);

        let mut canvas = Recorder::new(4);
        Cursor::new(&mut canvas).unwrap();
        assert_eq!(canvas.visits, vec![(2, 2)]);

        let mut grid = Grid::new(7).unwrap();
        Cursor::new(&mut grid).unwrap();
        assert!(grid.is_visited(3, 3));
        assert_eq!(grid.visited_count(), 1);
    }

    #[test]
    fn forward_and_back() {
        assert_eq!(visits(|c| c.forward(1).unwrap()), vec![(3, 2)]);
        assert_eq!(visits(|c| c.forward(2).unwrap()), vec![(3, 2), (3, 1)]);
        assert_eq!(visits(|c| c.backward(1).unwrap()), vec![(3, 4)]);
        assert_eq!(visits(|c| c.backward(2).unwrap()), vec![(3, 4), (3, 5)]);
        assert!(visits(|c| c.forward(0).unwrap()).is_empty());
        assert!(visits(|c| c.forward(-3).unwrap()).is_empty());
    }

    #[test]
    fn turns() {
        let left_once = visits(|c| {
            c.turn_left(45);
            c.forward(2).unwrap();
        });
        assert_eq!(left_once, vec![(2, 2), (1, 1)]);

        let left_twice = visits(|c| {
            c.turn_left(45);
            c.turn_left(45);
            c.forward(1).unwrap();
        });
        assert_eq!(left_twice, vec![(2, 3)]);

        let right_once = visits(|c| {
            c.turn_right(45);
            c.forward(2).unwrap();
        });
        assert_eq!(right_once, vec![(4, 2), (5, 1)]);

        let right_twice = visits(|c| {
            c.turn_right(45);
            c.turn_right(45);
            c.forward(1).unwrap();
        });
        assert_eq!(right_twice, vec![(4, 3)]);

        let left_right = visits(|c| {
            c.turn_left(90);
            c.turn_right(45);
            c.turn_right(45);
            c.forward(1).unwrap();
        });
        assert_eq!(left_right, vec![(3, 2)]);

        let left_over_half = visits(|c| {
            c.turn_left(225);
            c.forward(1).unwrap();
        });
        assert_eq!(left_over_half, vec![(4, 4)]);

        let right_over_half = visits(|c| {
            c.turn_right(270);
            c.forward(1).unwrap();
        });
        assert_eq!(right_over_half, vec![(2, 3)]);
    }

    #[test]
    fn one_step_per_heading() {
        let expected = [
            (0, (3, 2)),
            (45, (2, 2)),
            (90, (2, 3)),
            (135, (2, 4)),
            (180, (3, 4)),
            (225, (4, 4)),
            (270, (4, 3)),
            (315, (4, 2)),
        ];
        for (heading, cell) in expected {
            let v = visits(|c| {
                c.turn_left(heading);
                assert_eq!(c.heading(), heading);
                c.forward(1).unwrap();
            });
            assert_eq!(v, vec![cell], "heading {heading}");
        }
    }

    #[test]
    fn heading_stays_in_range() {
        let mut canvas = Recorder::new(7);
        let mut cursor = Cursor::new(&mut canvas).unwrap();
        cursor.turn_right(45);
        assert_eq!(cursor.heading(), 315);
        cursor.turn_left(45);
        assert_eq!(cursor.heading(), 0);
        cursor.turn_left(720 + 90);
        assert_eq!(cursor.heading(), 90);
        cursor.turn_right(-90);
        assert_eq!(cursor.heading(), 180);
        cursor.turn_left(-270);
        assert_eq!(cursor.heading(), 270);
        cursor.turn_right(i64::MIN);
        assert!((0..360).contains(&cursor.heading()));
        cursor.turn_left(i64::MAX);
        assert!((0..360).contains(&cursor.heading()));

        for d in (0..=720).step_by(45) {
            let mut canvas = Recorder::new(7);
            let mut cursor = Cursor::new(&mut canvas).unwrap();
            cursor.turn_left(d);
            cursor.turn_left((360 - d).rem_euclid(360));
            assert_eq!(cursor.heading(), 0, "{d}");
        }
    }

    #[test]
    fn there_and_back_again() {
        for heading in (0..360).step_by(45) {
            for n in 0..4 {
                let mut grid = Grid::new(9).unwrap();
                let mut cursor = Cursor::new(&mut grid).unwrap();
                cursor.turn_left(heading);
                cursor.forward(n).unwrap();
                cursor.backward(n).unwrap();
                assert_eq!(cursor.position(), (4, 4), "heading {heading}, {n} steps");
            }
        }
    }

    #[test]
    fn unsupported_heading() {
        let mut canvas = Recorder::new(7);
        let mut cursor = Cursor::new(&mut canvas).unwrap();
        cursor.turn_left(30);
        assert_eq!(
            cursor.forward(1),
            Err(ExecError::UnsupportedHeading { heading: 30 })
        );
        assert_eq!(cursor.forward(0), Ok(()));
        cursor.turn_right(15);
        assert_eq!(
            cursor.backward(2),
            Err(ExecError::UnsupportedHeading { heading: 15 })
        );
        cursor.turn_right(15);
        assert_eq!(cursor.backward(1), Ok(()));
        assert_eq!(canvas.visits, vec![(3, 3), (3, 4)]);
    }

    #[test]
    fn walking_off_the_edge() {
        let mut grid = Grid::new(3).unwrap();
        let mut cursor = Cursor::new(&mut grid).unwrap();
        assert_eq!(
            cursor.forward(3),
            Err(ExecError::OutOfBounds {
                x: 1,
                y: -1,
                size: 3
            })
        );
        assert_eq!(cursor.position(), (1, 0));
        assert!(grid.is_visited(1, 0));
        assert_eq!(grid.visited_count(), 2);
    }

    #[test]
    fn offsets() {
        assert_eq!(offset(90), Ok((-1, 0)));
        assert_eq!(offset(270), Ok((1, 0)));
        assert_eq!(offset(315), Ok((1, -1)));
        assert_eq!(
            offset(300),
            Err(ExecError::UnsupportedHeading { heading: 300 })
        );
        assert_eq!(offset(10), Err(ExecError::UnsupportedHeading { heading: 10 }));
    }
}
