//! Printing statements to stderr

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "W: ");
        let _ = write!(&mut outp, $formatstr $(,$arg)*);
        let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
        let _ = outp.flush();
    } }
}

/// Trace the steps of a layout chain. Silent unless
/// `resolver::DO_TRACE_LAYOUT` has been set, via
/// `alayout::resolver::DO_TRACE_LAYOUT.store(true,
/// std::sync::atomic::Ordering::SeqCst);`.
#[macro_export]
macro_rules! trace_layout {
    { $fmt:expr $(,$arg:expr)* } => {
        if $crate::resolver::DO_TRACE_LAYOUT.load(std::sync::atomic::Ordering::SeqCst) {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "T: ");
            let _ = write!(&mut outp, $fmt $(,$arg)*);
            let _ = writeln!(&mut outp);
            let _ = outp.flush();
        }
    }
}
