//! Junctions command implementation - tabulate splice regions

use anyhow::Result;
use std::fmt::{self, Write as _};
use std::path::PathBuf;

use isovis_core::{GeneLayout, NOT_DRAWN};

use crate::config::Config;

pub fn execute(config: &Config, input: PathBuf) -> Result<()> {
    let isoforms = super::load_isoforms(&input)?;
    let layout = GeneLayout::build(&isoforms.visible_cloned(), &config.layout_options());

    print!("{}", format_table(&layout)?);
    Ok(())
}

/// Tab-separated table of splice regions with their classification and heights.
pub(crate) fn format_table(layout: &GeneLayout) -> Result<String, fmt::Error> {
    let mut table = String::from("start\tend\tclass\theight\theight_all\n");

    let rows = layout
        .splice
        .regions
        .iter()
        .zip(layout.heights.iter().zip(&layout.heights_all));
    for (region, (&height, &height_all)) in rows {
        let class = if region.is_constitutive { "constitutive" } else { "alternative" };
        let height = if height == NOT_DRAWN {
            "-".to_string()
        } else {
            format!("{:.3}", height)
        };
        writeln!(
            table,
            "{}\t{}\t{}\t{}\t{:.3}",
            region.start, region.end, class, height, height_all
        )?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovis_core::{Interval, Isoform, LayoutOptions, Strand};

    #[test]
    fn test_table_rows() {
        let isoforms = vec![
            Isoform::new("A", Strand::Forward, vec![Interval::new(100, 200), Interval::new(300, 400)]),
            Isoform::new("B", Strand::Forward, vec![Interval::new(100, 200), Interval::new(300, 400)]),
        ];
        let layout = GeneLayout::build(&isoforms, &LayoutOptions::default());

        let table = format_table(&layout).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "start\tend\tclass\theight\theight_all");
        assert_eq!(lines[1], "200\t300\tconstitutive\t-\t1.000");
        assert_eq!(lines.len(), 2);
    }
}
