use std::fmt::{Debug, Display, Error, Formatter};

use crate::index_iterator::DynIndex;
use crate::layout::Layout;
use crate::tensor::View;

/// Entry in the formatted representation of a view's data.
enum Entry {
    Value(f32),

    /// "..." used to elide long dimensions.
    Ellipsis,
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Entry::Value(val) => write!(f, "{:?}", val),
            Entry::Ellipsis => write!(f, "..."),
        }
    }
}

/// Configuration for formatting of a view.
struct FormatOptions {
    /// Maximum number of entries to print along each dimension before
    /// eliding.
    max_entries: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { max_entries: 10 }
    }
}

/// Wrapper around a view reference with custom formatting options.
struct FormatView<'a> {
    view: &'a View,
    opts: FormatOptions,
}

impl<'a> FormatView<'a> {
    fn new(view: &'a View, opts: FormatOptions) -> Self {
        Self { view, opts }
    }

    /// Return the positions along a dimension of size `len` to print, with
    /// `None` marking where an ellipsis goes.
    fn visible(&self, len: usize) -> impl Iterator<Item = Option<usize>> {
        let max = self.opts.max_entries;
        let elide = len > max;
        let head = if elide { max / 2 } else { len };
        let tail_start = if elide { len - max / 2 } else { len };
        (0..head)
            .map(Some)
            .chain(elide.then_some(None))
            .chain((tail_start..len).map(Some))
    }

    /// Format the sub-view at `prefix` as nested lists. `prefix` holds
    /// the indices of the outer dimensions already selected.
    fn write_dim(&self, f: &mut Formatter<'_>, prefix: &mut DynIndex) -> Result<(), Error> {
        let dim = prefix.len();
        let size = self.view.size(dim);

        if dim + 1 == self.view.ndim() {
            let mut list = f.debug_list();
            for pos in self.visible(size) {
                match pos {
                    Some(i) => {
                        prefix.push(i);
                        let value = self.view.get(prefix).ok_or(Error)?;
                        prefix.pop();
                        list.entry(&Entry::Value(value));
                    }
                    None => {
                        list.entry(&Entry::Ellipsis);
                    }
                }
            }
            return list.finish();
        }

        write!(f, "[")?;
        for (n, pos) in self.visible(size).enumerate() {
            if n > 0 {
                write!(f, ",\n{}", " ".repeat(dim + 1))?;
            }
            match pos {
                Some(i) => {
                    prefix.push(i);
                    self.write_dim(f, prefix)?;
                    prefix.pop();
                }
                None => write!(f, "...")?,
            }
        }
        write!(f, "]")
    }
}

impl Debug for FormatView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.view.ndim() == 0 {
            let value = self.view.item().ok_or(Error)?;
            return write!(f, "({:?})", value);
        }
        self.write_dim(f, &mut DynIndex::new())
    }
}

impl Debug for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "View {{ offset: {}, shape: {:?}, strides: {:?}, data: {:?} }}",
            self.offset(),
            self.shape(),
            self.strides(),
            FormatView::new(self, FormatOptions::default())
        )
    }
}

impl Display for View {
    /// Format the elements of the view as nested lists.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", FormatView::new(self, FormatOptions::default()))
    }
}
