//! 展示用文本拼接：学生标签、姓名列表、职位 slug

/// 拼接姓名，任一部分为空时不留多余空格
pub fn full_name(first_name: &str, last_name: &str) -> String {
    let first = first_name.trim();
    let last = last_name.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (true, true) => String::new(),
    }
}

/// 学生标签："First Last · Grade N"
pub fn student_label(first_name: &str, last_name: &str, grade_level: i32) -> String {
    format!("{} · Grade {}", full_name(first_name, last_name), grade_level)
}

/// 以自然语言连接名字："Ada"、"Ada and Ben"、"Ada, Ben and Cy"
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|n| n.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// 由标题生成 slug：小写 ASCII 字母数字，其余字符折叠为单个 `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_label() {
        assert_eq!(student_label("Ada", "Lovelace", 5), "Ada Lovelace · Grade 5");
        assert_eq!(student_label("Ada", " ", 1), "Ada · Grade 1");
    }

    #[test]
    fn test_join_names() {
        let empty: [&str; 0] = [];
        assert_eq!(join_names(&empty), "");
        assert_eq!(join_names(&["Ada"]), "Ada");
        assert_eq!(join_names(&["Ada", "Ben"]), "Ada and Ben");
        assert_eq!(join_names(&["Ada", "Ben", "Cy"]), "Ada, Ben and Cy");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Senior Math Teacher"), "senior-math-teacher");
        assert_eq!(slugify("  Art & Design (Part-time) "), "art-design-part-time");
        assert_eq!(slugify("Éducation 2026"), "ducation-2026");
        assert_eq!(slugify("!!!"), "");
    }
}
