//! The renaming table: ordered (source name -> target name) pairs.
//!
//! Built once at startup and never mutated. Entries are ordered
//! longest-source-first so a bare name (`Button`) can never shadow a
//! prefixed one (`tk.Button`) during matching.

/// One rewrite rule: a widget construction name and its accessible
/// replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    /// Qualified or bare call-site name in the legacy code, e.g. `tk.Button`.
    pub source: String,
    /// Construction-function name in the destination API.
    pub target: String,
}

/// The fixed renaming table plus the two pieces of destination-API
/// knowledge the engine needs: the label keyword it injects and the
/// module the synthesized import pulls from.
///
/// Invariant (documented, relied on for idempotence): no target name
/// equals any source key, so a call site that has already been rewritten
/// matches no entry on a second pass.
#[derive(Debug, Clone)]
pub struct RenameTable {
    entries: Vec<RenameEntry>,
    label_keyword: String,
    import_module: String,
}

/// Default keyword argument carrying the accessible name.
pub const DEFAULT_LABEL_KEYWORD: &str = "accessible_name";

/// Default module the synthesized import declaration pulls from.
pub const DEFAULT_IMPORT_MODULE: &str = "tkaria11y.widgets";

/// The builtin widget mapping: standard tkinter (prefixed and bare),
/// ttk, and CustomTkinter (prefixed and bare).
const BUILTIN_MAPPING: &[(&str, &str)] = &[
    // Standard Tkinter widgets, tk. prefix
    ("tk.Button", "AccessibleButton"),
    ("tk.Entry", "AccessibleEntry"),
    ("tk.Label", "AccessibleLabel"),
    ("tk.Text", "AccessibleText"),
    ("tk.Checkbutton", "AccessibleCheckbutton"),
    ("tk.Radiobutton", "AccessibleRadiobutton"),
    ("tk.Scale", "AccessibleScale"),
    ("tk.Scrollbar", "AccessibleScrollbar"),
    ("tk.Listbox", "AccessibleListbox"),
    ("tk.Menu", "AccessibleMenu"),
    ("tk.Menubutton", "AccessibleMenubutton"),
    ("tk.Frame", "AccessibleFrame"),
    ("tk.LabelFrame", "AccessibleLabelFrame"),
    ("tk.Toplevel", "AccessibleToplevel"),
    ("tk.Canvas", "AccessibleCanvas"),
    ("tk.Message", "AccessibleMessage"),
    ("tk.Spinbox", "AccessibleSpinbox"),
    ("tk.PanedWindow", "AccessiblePanedWindow"),
    // Standard Tkinter widgets, direct import
    ("Button", "AccessibleButton"),
    ("Entry", "AccessibleEntry"),
    ("Label", "AccessibleLabel"),
    ("Text", "AccessibleText"),
    ("Checkbutton", "AccessibleCheckbutton"),
    ("Radiobutton", "AccessibleRadiobutton"),
    ("Scale", "AccessibleScale"),
    ("Scrollbar", "AccessibleScrollbar"),
    ("Listbox", "AccessibleListbox"),
    ("Menu", "AccessibleMenu"),
    ("Menubutton", "AccessibleMenubutton"),
    ("Frame", "AccessibleFrame"),
    ("LabelFrame", "AccessibleLabelFrame"),
    ("Toplevel", "AccessibleToplevel"),
    ("Canvas", "AccessibleCanvas"),
    ("Message", "AccessibleMessage"),
    ("Spinbox", "AccessibleSpinbox"),
    ("PanedWindow", "AccessiblePanedWindow"),
    // TTK widgets
    ("ttk.Button", "AccessibleTTKButton"),
    ("ttk.Entry", "AccessibleTTKEntry"),
    ("ttk.Label", "AccessibleTTKLabel"),
    ("ttk.Checkbutton", "AccessibleTTKCheckbutton"),
    ("ttk.Radiobutton", "AccessibleTTKRadiobutton"),
    ("ttk.Scale", "AccessibleTTKScale"),
    ("ttk.Scrollbar", "AccessibleTTKScrollbar"),
    ("ttk.Frame", "AccessibleTTKFrame"),
    ("ttk.LabelFrame", "AccessibleTTKLabelFrame"),
    ("ttk.Notebook", "AccessibleNotebook"),
    ("ttk.Progressbar", "AccessibleTTKProgressbar"),
    ("ttk.Separator", "AccessibleTTKSeparator"),
    ("ttk.Sizegrip", "AccessibleTTKSizegrip"),
    ("ttk.Treeview", "AccessibleTreeview"),
    ("ttk.Combobox", "AccessibleCombobox"),
    ("ttk.Spinbox", "AccessibleTTKSpinbox"),
    ("ttk.PanedWindow", "AccessibleTTKPanedWindow"),
    // CustomTkinter widgets, ctk. prefix
    ("ctk.CTkButton", "AccessibleCTKButton"),
    ("ctk.CTkEntry", "AccessibleCTKEntry"),
    ("ctk.CTkLabel", "AccessibleCTKLabel"),
    ("ctk.CTkCheckBox", "AccessibleCTKCheckBox"),
    ("ctk.CTkRadioButton", "AccessibleCTKRadioButton"),
    ("ctk.CTkSlider", "AccessibleCTKSlider"),
    ("ctk.CTkScrollbar", "AccessibleCTKScrollbar"),
    ("ctk.CTkFrame", "AccessibleCTKFrame"),
    ("ctk.CTkTabview", "AccessibleCTKTabview"),
    ("ctk.CTkProgressBar", "AccessibleCTKProgressBar"),
    ("ctk.CTkSwitch", "AccessibleCTKSwitch"),
    ("ctk.CTkComboBox", "AccessibleCTKComboBox"),
    ("ctk.CTkTextbox", "AccessibleCTKTextbox"),
    ("ctk.CTkScrollableFrame", "AccessibleCTKScrollableFrame"),
    ("ctk.CTkToplevel", "AccessibleCTKToplevel"),
    // CustomTkinter widgets, direct import
    ("CTkButton", "AccessibleCTKButton"),
    ("CTkEntry", "AccessibleCTKEntry"),
    ("CTkLabel", "AccessibleCTKLabel"),
    ("CTkCheckBox", "AccessibleCTKCheckBox"),
    ("CTkRadioButton", "AccessibleCTKRadioButton"),
    ("CTkSlider", "AccessibleCTKSlider"),
    ("CTkScrollbar", "AccessibleCTKScrollbar"),
    ("CTkFrame", "AccessibleCTKFrame"),
    ("CTkTabview", "AccessibleCTKTabview"),
    ("CTkProgressBar", "AccessibleCTKProgressBar"),
    ("CTkSwitch", "AccessibleCTKSwitch"),
    ("CTkComboBox", "AccessibleCTKComboBox"),
    ("CTkTextbox", "AccessibleCTKTextbox"),
    ("CTkScrollableFrame", "AccessibleCTKScrollableFrame"),
    ("CTkToplevel", "AccessibleCTKToplevel"),
];

impl RenameTable {
    /// The builtin tkinter/ttk/CustomTkinter -> tkaria11y mapping.
    pub fn builtin() -> Self {
        let entries = BUILTIN_MAPPING
            .iter()
            .map(|&(source, target)| RenameEntry {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        Self::from_entries(
            entries,
            DEFAULT_LABEL_KEYWORD.to_string(),
            DEFAULT_IMPORT_MODULE.to_string(),
        )
    }

    /// Build a table from arbitrary entries, ordering them
    /// longest-source-first. Callers (the config loader) are responsible
    /// for validating the entries beforehand.
    pub fn from_entries(
        mut entries: Vec<RenameEntry>,
        label_keyword: String,
        import_module: String,
    ) -> Self {
        // Longest first so `tk.Button` is tried before `Button`.
        entries.sort_by(|a, b| b.source.len().cmp(&a.source.len()));
        Self {
            entries,
            label_keyword,
            import_module,
        }
    }

    /// Entries in matching order.
    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    /// The keyword argument injected to carry the accessible name.
    pub fn label_keyword(&self) -> &str {
        &self.label_keyword
    }

    /// The module named by the synthesized import declaration.
    pub fn import_module(&self) -> &str {
        &self.import_module
    }

    /// Look up the target for a source name, if the table maps it.
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.target.as_str())
    }
}
