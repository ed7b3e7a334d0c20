//! Structured description of an emitted source file

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    /// Header comment lines, without the `//` prefix
    pub header: Vec<String>,
    /// `use` paths, without `use` and the trailing `;`
    pub uses: Vec<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Const(ConstItem),
    Struct(StructItem),
    Impl(ImplBlock),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstItem {
    pub doc: Option<String>,
    pub name: String,
    pub ty: String,
    /// Expression text
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructItem {
    pub doc: Option<String>,
    pub derives: Vec<String>,
    /// Outer attributes other than derives, without `#[` `]`
    pub attrs: Vec<String>,
    pub name: String,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub doc: Option<String>,
    pub attrs: Vec<String>,
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplBlock {
    pub target: String,
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub doc: Option<String>,
    pub public: bool,
    pub is_async: bool,
    pub name: String,
    /// Parameters as written, receiver included
    pub params: Vec<String>,
    /// Return type, `None` for unit
    pub ret: Option<String>,
    /// Body statements, one per line, relative indentation preserved
    pub body: String,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            doc: None,
            public: true,
            is_async: false,
            name: name.into(),
            params: Vec::new(),
            ret: None,
            body: String::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    pub fn returns(mut self, ret: impl Into<String>) -> Self {
        self.ret = Some(ret.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            doc: None,
            attrs: Vec::new(),
            name: name.into(),
            ty: ty.into(),
        }
    }
}
