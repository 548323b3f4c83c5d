use crate::schema::*;

pub fn format_x(x: u32, info: &DatasetInfo) -> String {
    match info.vary {
        Parameter::Size => format_size(x),
        Parameter::Skew => format!("{}:1", 1u64 << x.min(63)),
        Parameter::Duplicates => format!("{:.2}", x as f64 / PERCENT_F),
    }
}

pub fn format_size(size: u32) -> String {
    match size {
        0..=9   => format!("{}", 1 << size),
        10..=19 => format!("{}Ki", 1 << (size - 10)),
        20..=29 => format!("{}Mi", 1 << (size - 20)),
        30..=39 => format!("{}Gi", 1 << (size - 30)),
        _ => size.to_string(),
    }
}

pub fn format_time(nanos: u64) -> String {
    if nanos < 10u64.pow(3) {
        format!("{}ns", nanos)
    }
    else if nanos < 10u64.pow(6) {
        format!("{:.1}µs", nanos as f64 / 10u64.pow(3) as f64)
    }
    else if nanos < 10u64.pow(9) {
        format!("{:.1}ms", nanos as f64 / 10u64.pow(6) as f64)
    }
    else {
        format!("{:.2}s", nanos as f64 / 10u64.pow(9) as f64)
    }
}

pub fn format_xlabel(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::Size => "size",
        Parameter::Skew => "skew",
        Parameter::Duplicates => "duplicates",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(3), "8");
        assert_eq!(format_size(12), "4Ki");
        assert_eq!(format_size(20), "1Mi");
    }

    #[test]
    fn times() {
        assert_eq!(format_time(999), "999ns");
        assert_eq!(format_time(1_500), "1.5µs");
        assert_eq!(format_time(2_000_000_000), "2.00s");
    }
}
