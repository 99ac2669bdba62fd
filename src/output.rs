use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::{ErrorKind, Result, ResultExt};
use crate::math::Point;
use crate::walk::Trajectory;

pub const FINAL_POSITIONS_FILE: &str = "final_positions.dat";
pub const SURFACE_FILE: &str = "surface.dat";
pub const TRAJECTORIES_DIR: &str = "trajectories";

/// Writes one `x y z` row per point.
pub fn write_points<'a, P, I>(path: P, points: I) -> Result<()>
    where P: AsRef<Path>,
          I: IntoIterator<Item = &'a Point>
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .chain_err(|| format!("Error creating directory {:?}", parent))?;
        }
    }

    let file = File::create(path).chain_err(|| format!("Error creating {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for point in points {
        writeln!(writer, "{}", point).chain_err(|| format!("Error writing {:?}", path))?;
    }
    writer.flush().chain_err(|| format!("Error writing {:?}", path))?;
    Ok(())
}

/// Writes the final position of every walker to `final_positions.dat` and
/// each logged trajectory to `trajectories/walker_NNNN.dat` under `dir`.
pub fn write_trajectories<P: AsRef<Path>>(dir: P, trajectories: &[Trajectory]) -> Result<()> {
    let dir = dir.as_ref();
    let final_positions = trajectories.iter().filter_map(Trajectory::final_position);
    write_points(dir.join(FINAL_POSITIONS_FILE), final_positions)?;
    for trajectory in trajectories {
        let path = dir.join(TRAJECTORIES_DIR).join(format!("walker_{:04}.dat", trajectory.walker));
        write_points(&path, &trajectory.positions)?;
    }
    info!("Saved {} trajectories to {:?}.", trajectories.len(), dir);
    Ok(())
}

/// Reads rows of three whitespace-separated reals. Blank lines are skipped.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let file = File::open(path).chain_err(|| format!("Error opening {:?}", path))?;
    let mut points = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.chain_err(|| format!("Error reading {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        points.push(parse_row(index + 1, &line)?);
    }
    Ok(points)
}

fn parse_row(line_number: usize, line: &str) -> Result<Point> {
    let malformed = || ErrorKind::MalformedPointRow(line_number, line.to_owned());
    let mut coordinates = [0.0; 3];
    let mut fields = line.split_whitespace();
    for coordinate in coordinates.iter_mut() {
        let field = fields.next().ok_or_else(malformed)?;
        *coordinate = field.parse::<f64>().chain_err(malformed)?;
    }
    if fields.next().is_some() {
        return Err(malformed().into());
    }
    Ok(Point::from_array(coordinates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use tempfile::tempdir;

    #[test]
    fn written_rows_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("points.dat");
        let points = vec![point(1.0, -2.5, 3.25), point(0.0, 0.0, 1e-3)];
        write_points(&path, &points).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1 -2.5 3.25\n0 0 0.001\n");
        assert_eq!(read_points(&path).unwrap(), points);
    }

    #[test]
    fn tolerates_extra_whitespace_and_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.dat");
        fs::write(&path, "  1\t2   3\n\n4 5 6  \n").unwrap();
        assert_eq!(read_points(&path).unwrap(),
                   vec![point(1.0, 2.0, 3.0), point(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn malformed_rows_report_line() {
        let dir = tempdir().unwrap();
        for &content in &["1 2 3\n1 2\n", "1 2 3\n1 2 x\n", "1 2 3\n1 2 3 4\n"] {
            let path = dir.path().join("bad.dat");
            fs::write(&path, content).unwrap();
            let err = read_points(&path).unwrap_err();
            match *err.kind() {
                ErrorKind::MalformedPointRow(line, _) => assert_eq!(line, 2),
                ref other => panic!("unexpected error for {:?}: {}", content, other),
            }
        }
    }

    #[test]
    fn trajectories_are_saved_per_walker() {
        let dir = tempdir().unwrap();
        let trajectories = vec![Trajectory {
                                    walker: 0,
                                    positions: vec![point(0.0, 0.0, 1.0), point(0.0, 1.0, 0.0)],
                                },
                                Trajectory {
                                    walker: 1,
                                    positions: vec![point(0.0, 0.0, 1.0), point(1.0, 0.0, 0.0)],
                                }];
        write_trajectories(dir.path(), &trajectories).unwrap();

        assert_eq!(read_points(dir.path().join(FINAL_POSITIONS_FILE)).unwrap(),
                   vec![point(0.0, 1.0, 0.0), point(1.0, 0.0, 0.0)]);
        let walker_1 = dir.path().join(TRAJECTORIES_DIR).join("walker_0001.dat");
        assert_eq!(read_points(walker_1).unwrap(), trajectories[1].positions);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_points(dir.path().join("missing.dat")).is_err());
    }
}
