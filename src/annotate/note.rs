//! Annotation block rendering
//!
//! The inserted block is a fixed five-line template. Only the wording of the
//! three body lines varies, by locale.

use serde::{Deserialize, Serialize};

use crate::classify::HeaderMatch;

/// Language of the generated note text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteLocale {
    #[default]
    English,
    Arabic,
}

impl NoteLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteLocale::English => "english",
            NoteLocale::Arabic => "arabic",
        }
    }

    /// Placeholder rendered when a header has no parameters
    pub fn empty_placeholder(&self) -> &'static str {
        match self {
            NoteLocale::English => "none",
            NoteLocale::Arabic => "بدون",
        }
    }

    fn summary_line(&self, name: &str) -> String {
        match self {
            NoteLocale::English => {
                format!("Note: function {}, brief auto-generated description of its purpose.", name)
            }
            NoteLocale::Arabic => format!("ملاحظة: الدالة {} — وصف تلقائي موجز لوظيفتها.", name),
        }
    }

    fn inputs_label(&self) -> &'static str {
        match self {
            NoteLocale::English => "Inputs",
            NoteLocale::Arabic => "المدخلات",
        }
    }

    fn outputs_line(&self) -> &'static str {
        match self {
            NoteLocale::English => "Outputs: see implementation",
            NoteLocale::Arabic => "المخرجات: راجع التنفيذ",
        }
    }
}

impl std::str::FromStr for NoteLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(NoteLocale::English),
            "arabic" | "ar" => Ok(NoteLocale::Arabic),
            _ => Err(format!("Unknown note locale: {}", s)),
        }
    }
}

/// Rendering settings shared by every block in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteTemplate {
    pub locale: NoteLocale,
    /// Overrides the locale's empty-parameter placeholder
    pub empty_placeholder: Option<String>,
}

impl NoteTemplate {
    pub fn new(locale: NoteLocale) -> Self {
        Self {
            locale,
            empty_placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_placeholder = Some(placeholder.into());
        self
    }

    pub fn placeholder(&self) -> &str {
        self.empty_placeholder
            .as_deref()
            .unwrap_or_else(|| self.locale.empty_placeholder())
    }
}

/// One comment block about to be inserted above a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBlock<'a> {
    pub indentation: &'a str,
    pub name: &'a str,
    pub parameters: &'a str,
}

impl<'a> AnnotationBlock<'a> {
    pub fn for_header(header: &'a HeaderMatch) -> Self {
        Self {
            indentation: &header.indentation,
            name: &header.name,
            parameters: &header.parameters,
        }
    }

    /// Render the block, each line indented like the header and ending in
    /// `terminator`
    pub fn render(&self, template: &NoteTemplate, terminator: &str) -> Vec<String> {
        let locale = template.locale;
        let params = match self.parameters.trim() {
            "" => template.placeholder(),
            trimmed => trimmed,
        };

        let body = [
            "/**".to_string(),
            format!(" * {}", locale.summary_line(self.name)),
            format!(" * {}: {}", locale.inputs_label(), params),
            format!(" * {}", locale.outputs_line()),
            " */".to_string(),
        ];

        body.into_iter()
            .map(|line| format!("{}{}{}", self.indentation, line, terminator))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_english_block() {
        let header = classify("function greet(name) {").unwrap();
        let lines = AnnotationBlock::for_header(&header).render(&NoteTemplate::default(), "\n");
        assert_eq!(
            lines,
            vec![
                "/**\n",
                " * Note: function greet, brief auto-generated description of its purpose.\n",
                " * Inputs: name\n",
                " * Outputs: see implementation\n",
                " */\n",
            ]
        );
    }

    #[test]
    fn test_render_uses_header_indentation() {
        let header = classify("\t  const f = (x) => {").unwrap();
        let lines = AnnotationBlock::for_header(&header).render(&NoteTemplate::default(), "\r\n");
        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert!(line.starts_with("\t  /") || line.starts_with("\t   *"), "{:?}", line);
            assert!(line.ends_with("\r\n"));
        }
    }

    #[test]
    fn test_empty_parameters_render_placeholder() {
        let header = classify("function noop() {").unwrap();
        let block = AnnotationBlock::for_header(&header);

        let english = block.render(&NoteTemplate::default(), "\n");
        assert_eq!(english[2], " * Inputs: none\n");

        let arabic = block.render(&NoteTemplate::new(NoteLocale::Arabic), "\n");
        assert_eq!(arabic[2], " * المدخلات: بدون\n");

        let custom = block.render(&NoteTemplate::default().with_placeholder("(void)"), "\n");
        assert_eq!(custom[2], " * Inputs: (void)\n");
    }

    #[test]
    fn test_whitespace_only_parameters_count_as_empty() {
        let block = AnnotationBlock {
            indentation: "",
            name: "f",
            parameters: "   ",
        };
        let lines = block.render(&NoteTemplate::default(), "\n");
        assert_eq!(lines[2], " * Inputs: none\n");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("english".parse::<NoteLocale>(), Ok(NoteLocale::English));
        assert_eq!("AR".parse::<NoteLocale>(), Ok(NoteLocale::Arabic));
        assert!("klingon".parse::<NoteLocale>().is_err());
    }
}
