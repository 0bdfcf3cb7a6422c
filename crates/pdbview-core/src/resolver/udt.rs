//! The user-defined-types listing.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{PdbType, PdbTypeReader};
use crate::error::PdbResult;
use crate::tpi::TypeRecordProvider;
use crate::types::TypeIndex;

impl<P: TypeRecordProvider> PdbTypeReader<P>
{
    /// Every class, union and enum in the stream, once each, in index order.
    ///
    /// Forward declarations that resolve to a definition elsewhere are left
    /// out, so each type appears under the index of its definition.
    /// Declarations with no definition stay in the list as incomplete types.
    ///
    /// Computed on first call and kept for the rest of the session.
    ///
    /// ## Errors
    ///
    /// Propagates the first resolution error. A failed computation is not
    /// cached; the next call tries again.
    pub fn user_defined_types(&self) -> PdbResult<&[Arc<PdbType>]>
    {
        self.user_defined_types
            .get_or_try_init(|| self.collect_user_defined_types())
            .map(Vec::as_slice)
    }

    fn collect_user_defined_types(&self) -> PdbResult<Vec<Arc<PdbType>>>
    {
        let mut types = Vec::new();

        for position in 0..self.provider.record_count() {
            let index = TypeIndex::from_array_index(position);
            if !self.provider.kind_at(index)?.is_user_defined() {
                continue;
            }

            let resolved = self.resolve(index)?;
            if resolved.record_index() != Some(index) {
                trace!("Skipping forward reference {index}, defined at {:?}", resolved.record_index());
                continue;
            }
            types.push(resolved);
        }

        debug!("Collected {} user-defined types", types.len());
        Ok(types)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::tpi::TpiStream;
    use crate::config::{ResolverConfig, UnsupportedRecordPolicy};
    use crate::types::{ClassRecord, EnumRecord, PointerRecord, TagRecord, TypeLeafKind, TypeRecord, UnionRecord};

    #[test]
    fn test_lists_tags_only_in_index_order()
    {
        let mut builder = TpiStream::builder();
        let color = builder.push(EnumRecord {
            tag: TagRecord::new(TypeLeafKind::LF_ENUM, "Color"),
            underlying_type: TypeIndex::new(0x0074),
        });
        builder.push(PointerRecord::new(color, 8 << 13));
        let value = builder.push(UnionRecord {
            tag: TagRecord::new(TypeLeafKind::LF_UNION, "Value"),
            size: 8,
        });
        let widget = builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_CLASS, "Widget"), 16));
        let reader = PdbTypeReader::new(builder.build().unwrap());

        let indices: Vec<_> = reader
            .user_defined_types()
            .unwrap()
            .iter()
            .map(|ty| ty.original_index())
            .collect();
        assert_eq!(indices, vec![color, value, widget]);
    }

    #[test]
    fn test_other_kinds_are_not_resolved()
    {
        let mut builder = TpiStream::builder();
        builder.push(TypeRecord::Unsupported {
            kind: TypeLeafKind::LF_FIELDLIST,
        });
        let point = builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "Point"), 8));
        let config = ResolverConfig::default().with_unsupported_records(UnsupportedRecordPolicy::Strict);
        let reader = PdbTypeReader::with_config(builder.build().unwrap(), config);

        let types = reader.user_defined_types().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].original_index(), point);
        assert_eq!(reader.cached_len(), 1);
    }

    #[test]
    fn test_computed_once()
    {
        let mut builder = TpiStream::builder();
        builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "S"), 4));
        let reader = PdbTypeReader::new(builder.build().unwrap());

        let first = reader.user_defined_types().unwrap();
        let second = reader.user_defined_types().unwrap();
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert!(Arc::ptr_eq(&first[0], &reader.resolve(TypeIndex::new(0x1000)).unwrap()));
    }
}
