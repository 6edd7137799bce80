pub trait Capitalize {
    fn capitalize(&self) -> String;
}

impl Capitalize for str {
    /// Title-cases each dash-separated part: `mr-mime` becomes `Mr-Mime`.
    fn capitalize(&self) -> String {
        self.split('-')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}
