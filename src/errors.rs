error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(::std::io::Error);
        Cli(::clap::Error);
        ParseFloat(::std::num::ParseFloatError);
    }

    errors {
        UnboundField {
            description("Surface has no bound field.")
            display("Surface has no bound field or spacing; it must be constructed \
                     from a field to project or snap points.")
        }
        EmptySurface {
            description("Surface has no points.")
            display("Surface has no points.")
        }
        InvalidSpacing(h: f64) {
            description("Invalid grid spacing.")
            display("Invalid grid spacing {}; expected a finite value > 0.", h)
        }
        InvalidInterval(min: f64, max: f64) {
            description("Invalid interval.")
            display("Invalid interval [{}, {}]; expected finite bounds with min < max.",
                    min,
                    max)
        }
        ResourceExhausted(num_points: usize) {
            description("Could not allocate the point buffer.")
            display("Could not allocate a buffer for {} points.", num_points)
        }
        InvalidConfig(msg: String) {
            description("Invalid walk configuration.")
            display("Invalid walk configuration: {}", msg)
        }
        MalformedPointRow(line: usize, content: String) {
            description("Malformed point row.")
            display("Malformed point row at line {}: '{}'", line, content)
        }
        DegenerateVector {
            description("Zero-length vector.")
            display("Cannot measure the angle of a zero-length vector.")
        }
    }
}
