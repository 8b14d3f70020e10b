//! Reference vector for a selection
//!
//! The reference is what every candidate is scored against. One selected
//! item is its own reference; several selected items are averaged per field.

use ahash::AHashSet;
use animatch_core::{EmbeddedItem, EmbeddingField, Embeddings, Error, ItemId, Result, Vector};

/// Collapse duplicate ids, keeping first-seen order
pub(crate) fn dedup_ids(selected_ids: &[ItemId]) -> Vec<ItemId> {
    let mut seen = AHashSet::with_capacity(selected_ids.len());
    selected_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Build the reference item for `selected_ids`
///
/// - A single selected id yields a clone of that catalog item.
/// - Several ids yield, per field, the element-wise mean over every resolved
///   item with a non-empty vector for that field. A field no resolved item
///   carries stays absent.
///
/// The synthetic item takes the first resolved id and joins the titles
/// with `" + "`.
///
/// Fails with [`Error::NotFound`] when no id resolves, and with
/// [`Error::FieldDimension`] when the selected items disagree on a field's
/// dimension.
pub fn compute_reference_vector(
    selected_ids: &[ItemId],
    catalog: &[EmbeddedItem],
) -> Result<EmbeddedItem> {
    let ids = dedup_ids(selected_ids);
    let resolved = resolve(&ids, catalog);

    match resolved.as_slice() {
        [] => Err(Error::NotFound { ids }),
        [single] => Ok((*single).clone()),
        many => average(many),
    }
}

/// Resolved items in selection order
fn resolve<'a>(ids: &[ItemId], catalog: &'a [EmbeddedItem]) -> Vec<&'a EmbeddedItem> {
    ids.iter()
        .filter_map(|id| catalog.iter().find(|item| item.id == *id))
        .collect()
}

fn average(items: &[&EmbeddedItem]) -> Result<EmbeddedItem> {
    let mut embeddings = Embeddings::default();

    for field in EmbeddingField::ALL {
        let mean = Vector::mean(items.iter().filter_map(|item| item.embeddings.non_empty(field)))
            .map_err(|err| err.in_field(field))?;
        embeddings.set(field, mean);
    }

    let title = items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(" + ");

    Ok(EmbeddedItem {
        id: items[0].id,
        title,
        embeddings,
    })
}
