/// Options shared by every generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Newlines and indentation. When off, generated markup and rules run
    /// together on one line; custom CSS and JS keep their own line breaks.
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Emit the global CSS reset.
    pub include_reset: bool,
    /// Emit keyframes, hover and scroll rules.
    pub include_animations: bool,
    /// Emit `@media` blocks for responsive overrides.
    pub include_responsive: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            include_reset: true,
            include_animations: true,
            include_responsive: true,
        }
    }
}

/// Output buffer with indentation tracking.
pub struct Context<'a> {
    pub options: &'a ExportOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    /// A pre-rendered block (custom CSS or script). Pretty output
    /// re-indents each line; compact output keeps the block verbatim,
    /// newlines included, since joining lines can change its meaning.
    pub fn add_block(&mut self, block: &str) {
        if self.options.pretty {
            for line in block.lines() {
                self.add_line(line);
            }
            return;
        }
        self.add(block);
        if !block.ends_with('\n') {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn into_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_lines_are_indented() {
        let options = ExportOptions::default();
        let mut ctx = Context::new(&options);
        ctx.add_line("<div>");
        ctx.indent();
        ctx.add_line("<p>hi</p>");
        ctx.dedent();
        ctx.dedent();
        ctx.add_line("</div>");
        assert_eq!(ctx.into_output(), "<div>\n  <p>hi</p>\n</div>\n");
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        let options = ExportOptions {
            pretty: false,
            ..Default::default()
        };
        let mut ctx = Context::new(&options);
        ctx.indent();
        ctx.add_line("<div>");
        ctx.add_line("</div>");
        assert_eq!(ctx.into_output(), "<div></div>");
    }

    #[test]
    fn compact_blocks_keep_their_newlines() {
        let options = ExportOptions {
            pretty: false,
            ..Default::default()
        };
        let mut ctx = Context::new(&options);
        ctx.indent();
        ctx.add_line("<script>");
        ctx.add_block("// boot\nwindow.ready = true");
        ctx.add_line("</script>");
        assert_eq!(
            ctx.into_output(),
            "<script>// boot\nwindow.ready = true\n</script>"
        );
    }
}
