pub use crate::table::*;
use crate::{Error, FontResult};

/// The decoded required tables of a TrueType-outlined container.
///
/// Every table listed here must be present; a container missing any of them
/// fails to load.
pub struct RawFont {
    pub head: TableHead,
    pub maxp: TableMaxp,
    pub cmap: TableCmap,
    pub loca: TableLoca,
    pub glyf: TableGlyf,
    pub hhea: TableHhea,
    pub hmtx: TableHmtx,
}

fn table<'a>(
    data: &'a [u8],
    dir: &TableDirectory,
    tag: &[u8; 4],
    missing: Error,
) -> FontResult<&'a [u8]> {
    let offset = dir.map.get(tag).ok_or(missing)?.offset;
    data.get(offset..).ok_or(Error::io("Font: Table offset past the end of the data"))
}

impl RawFont {
    pub fn new(data: &[u8]) -> FontResult<RawFont> {
        let dir = TableDirectory::new(data)?;

        let head = TableHead::new(table(
            data,
            &dir,
            b"head",
            Error::container("Font: Missing head table"),
        )?)?;
        let maxp = TableMaxp::new(table(
            data,
            &dir,
            b"maxp",
            Error::container("Font: Missing maxp table"),
        )?)?;
        let cmap = TableCmap::new(table(
            data,
            &dir,
            b"cmap",
            Error::container("Font: Missing cmap table"),
        )?)?;
        let hhea = TableHhea::new(table(
            data,
            &dir,
            b"hhea",
            Error::container("Font: Missing hhea table"),
        )?)?;
        let hmtx = TableHmtx::new(
            table(data, &dir, b"hmtx", Error::container("Font: Missing hmtx table"))?,
            maxp.num_glyphs,
            hhea.num_long_hmetrics,
        )?;
        let loca = TableLoca::new(
            table(data, &dir, b"loca", Error::container("Font: Missing loca table"))?,
            head.index_to_loc_format,
            maxp.num_glyphs,
        )?;
        let glyf = TableGlyf::new(
            table(data, &dir, b"glyf", Error::container("Font: Missing glyf table"))?,
            &loca.locations,
        )?;

        Ok(RawFont {
            head,
            maxp,
            cmap,
            loca,
            glyf,
            hhea,
            hmtx,
        })
    }
}
