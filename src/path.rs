use std::path::{Path, PathBuf, Component, is_separator};


// ------------------------------------------------------------------
// Extensions, on strings since layout names come in as strings.

/// The extension of the last segment of `s`, including the dot, or
/// `""`. A leading dot does not start an extension (".profile" has
/// none), trailing separators are ignored. These are the rules
/// template engines in the Node world use, e.g. "main.ejs" ->
/// ".ejs", "main" -> "", "main." -> ".".
pub fn extname(s: &str) -> &str {
    let s = s.trim_end_matches(is_separator);
    let segment = match s.rfind(is_separator) {
        Some(i) => &s[i + 1..],
        None => s,
    };
    if segment == ".." {
        return "";
    }
    match segment.rfind('.') {
        None | Some(0) => "",
        Some(i) => &segment[i..],
    }
}

/// Append `ext` (which includes the dot) unless `name` already ends
/// in exactly that extension.
pub fn with_default_extension(name: &str, ext: &str) -> String {
    if extname(name) == ext {
        name.into()
    } else {
        format!("{name}{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! t {
        ($e:expr, $r:expr) => {
            assert_eq!(extname($e), $r);
        }
    }

    #[test]
    fn t_extname() {
        t!("main", "");
        t!("main.ejs", ".ejs");
        t!("main.", ".");
        t!("/views/main.html.ejs", ".ejs");
        t!("foo.d/main", "");
        t!(".profile", "");
        t!("..", "");
        t!("main.ejs/", ".ejs");
    }

    #[test]
    fn t_with_default_extension() {
        assert_eq!(with_default_extension("main", ".ejs"), "main.ejs");
        assert_eq!(with_default_extension("main.ejs", ".ejs"), "main.ejs");
        assert_eq!(with_default_extension("main.html", ".ejs"), "main.html.ejs");
        assert_eq!(with_default_extension("/layout", ".hbs"), "/layout.hbs");
    }

    #[test]
    fn t_join_normalized() {
        let j = |a: &str, b: &str| join_normalized(Path::new(a), Path::new(b));
        assert_eq!(j("/views", "main.ejs"), PathBuf::from("/views/main.ejs"));
        // An absolute name stays below the root
        assert_eq!(j("/views", "/layout.ejs"), PathBuf::from("/views/layout.ejs"));
        assert_eq!(j("/views/", "./a/../b.ejs"), PathBuf::from("/views/b.ejs"));
        assert_eq!(j("/views", "../../../x.ejs"), PathBuf::from("/x.ejs"));
        assert_eq!(j("views", "../../x.ejs"), PathBuf::from("../x.ejs"));
        assert_eq!(j("views", "sub//x.ejs"), PathBuf::from("views/sub/x.ejs"));
        // unsized and owned arguments
        assert_eq!(join_normalized(Path::new("/v"), "a.ejs"), PathBuf::from("/v/a.ejs"));
        assert_eq!(join_normalized(Path::new("/v"), &String::from("a.ejs")),
                   PathBuf::from("/v/a.ejs"));
    }
}

// ------------------------------------------------------------------

fn push_normalized(out: &mut PathBuf, component: Component) {
    match component {
        Component::CurDir => (),
        Component::ParentDir =>
            match out.components().next_back() {
                Some(Component::Normal(_)) => { out.pop(); }
                // can't go above the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => (),
                _ => out.push(".."),
            },
        c => out.push(c),
    }
}

/// Join `rel` onto `base` the way Node's `path.join` does: unlike
/// `PathBuf::push`, an absolute `rel` does not replace `base` but is
/// appended to it, and `.` / `..` segments are resolved lexically
/// (no file system access, symlinks are not looked at).
pub fn join_normalized<P: AsRef<Path> + ?Sized>(base: &Path, rel: &P) -> PathBuf {
    let mut p = PathBuf::new();
    for component in base.components() {
        push_normalized(&mut p, component);
    }
    for component in rel.as_ref().components() {
        match component {
            Component::RootDir | Component::Prefix(_) => (),
            c => push_normalized(&mut p, c),
        }
    }
    if p.as_os_str().is_empty() {
        p.push(".");
    }
    p
}
